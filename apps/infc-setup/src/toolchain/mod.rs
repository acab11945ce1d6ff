//! Building blocks of the download-verify-extract pipeline.
//!
//! ## Module Structure
//!
//! - [`platform`] - OS and architecture detection
//! - [`target`] - Archive names, local paths and download URLs
//! - [`retry`] - Fixed-delay retry of async operations
//! - [`readiness`] - Polling until a file can be opened exclusively
//! - [`download`] - Streaming HTTP download with progress logging
//! - [`archive`] - Extraction through the external archive tool

pub mod archive;
pub mod download;
pub mod platform;
pub mod readiness;
pub mod retry;
pub mod target;

pub use archive::extract_archive;
pub use download::{DownloadSession, Downloader};
pub use platform::{ArchFamily, PlatformIdentity};
pub use readiness::{ReadinessPolicy, wait_until_ready};
pub use retry::{RetryPolicy, retry};
pub use target::InstallTarget;
