//! Top-level flows of infc-setup.
//!
//! - [`install`] - precondition checks, download, size check, readiness wait, extraction
//! - [`uninstall`] - best-effort removal of the archive and the extracted toolchain
//! - [`status`] - read-only report of configuration and installation state

pub mod install;
pub mod status;
pub mod uninstall;

pub use install::{InstallOutcome, install, install_for};
pub use status::{CheckStatus, StatusCheck, StatusReport, run_all_checks};
pub use uninstall::{CleanupOutcome, UninstallReport, uninstall};
