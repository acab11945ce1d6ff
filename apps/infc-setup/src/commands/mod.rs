//! Subcommand implementations for the infc-setup CLI.
//!
//! - [`install`] - Download and extract the toolchain
//! - [`uninstall`] - Remove the archive and the extracted toolchain
//! - [`status`] - Show configuration and installation state

pub mod install;
pub mod status;
pub mod uninstall;
