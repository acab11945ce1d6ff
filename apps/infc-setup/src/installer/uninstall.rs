//! The uninstall flow.
//!
//! Removes the downloaded archive and the extracted toolchain. Both steps
//! always run; a missing target is not an error and any other failure is only
//! logged.

use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::config::{INSTALL_DIR_ENV, SetupConfig};
use crate::toolchain::{InstallTarget, PlatformIdentity};

/// What happened to one cleanup target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The target was deleted.
    Removed,
    /// The target did not exist.
    NotFound,
    /// The target could not be located because it is not configured.
    Skipped,
    /// Deletion failed; the message describes why.
    Failed(String),
}

impl CleanupOutcome {
    /// Returns a short label for CLI output.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Removed => "removed",
            Self::NotFound => "not found",
            Self::Skipped => "skipped",
            Self::Failed(message) => message,
        }
    }
}

/// Outcome of both cleanup steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    /// The downloaded archive.
    pub archive: CleanupOutcome,
    /// The extracted toolchain directory.
    pub extracted: CleanupOutcome,
}

impl UninstallReport {
    /// Returns true if either step failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        matches!(self.archive, CleanupOutcome::Failed(_))
            || matches!(self.extracted, CleanupOutcome::Failed(_))
    }
}

/// Removes the archive and the extracted toolchain of the configured package.
pub async fn uninstall(config: &SetupConfig) -> UninstallReport {
    let target = InstallTarget::new(
        &config.package,
        &PlatformIdentity::detect(),
        &config.source_dir,
        config.install_dir(),
    );

    let archive = remove_archive(&target.archive_local_path).await;

    let extracted = if let Some(dir) = target.extraction_path() {
        remove_toolchain_dir(&dir).await
    } else {
        info!("{INSTALL_DIR_ENV} is not set, skipping removal of the extracted toolchain");
        CleanupOutcome::Skipped
    };

    UninstallReport { archive, extracted }
}

async fn remove_archive(path: &Path) -> CleanupOutcome {
    let result = tokio::fs::remove_file(path).await;
    classify("archive", path, result)
}

async fn remove_toolchain_dir(path: &Path) -> CleanupOutcome {
    let result = tokio::fs::remove_dir_all(path).await;
    classify("toolchain directory", path, result)
}

fn classify(what: &str, path: &Path, result: io::Result<()>) -> CleanupOutcome {
    match result {
        Ok(()) => {
            info!("Removed {what} {}", path.display());
            CleanupOutcome::Removed
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No {what} found at {}", path.display());
            CleanupOutcome::NotFound
        }
        Err(e) => {
            warn!("Failed to remove {what} {}: {e}", path.display());
            CleanupOutcome::Failed(format!("failed to remove {}: {e}", path.display()))
        }
    }
}
