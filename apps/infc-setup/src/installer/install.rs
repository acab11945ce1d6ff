//! The install flow.
//!
//! Steps, in order:
//!
//! 1. the source directory must exist
//! 2. an install directory must be configured
//! 3. if the toolchain is already extracted, stop successfully
//! 4. the archive tool must be found
//! 5. the install directory is created
//! 6. a distribution URL must be configured
//! 7. download the archive (retried)
//! 8. reject archives below the minimum size
//! 9. wait until the archive can be opened exclusively
//! 10. extract it (retried)
//!
//! Steps 1, 2, 4 and 6 fail with [`SetupError::Config`] and are never retried.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{ARCHIVER_ENV, DIST_URL_ENV, INSTALL_DIR_ENV, SetupConfig};
use crate::errors::SetupError;
use crate::toolchain::{
    Downloader, InstallTarget, PlatformIdentity, extract_archive, retry, wait_until_ready,
};

/// Result of a successful install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The toolchain was downloaded and extracted.
    Installed {
        /// The extracted toolchain directory.
        path: PathBuf,
    },
    /// The toolchain directory already existed; nothing was done.
    AlreadyInstalled {
        /// The existing toolchain directory.
        path: PathBuf,
    },
}

impl InstallOutcome {
    /// Returns the toolchain directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Installed { path } | Self::AlreadyInstalled { path } => path,
        }
    }
}

/// Installs the configured toolchain for the host platform.
///
/// # Errors
///
/// See [`install_for`].
pub async fn install(config: &SetupConfig) -> Result<InstallOutcome> {
    install_for(config, &PlatformIdentity::detect()).await
}

/// Installs the configured toolchain for `platform`.
///
/// # Errors
///
/// Returns an error if:
/// - a precondition fails ([`SetupError::Config`])
/// - the download fails on every attempt ([`SetupError::RetriesExhausted`])
/// - the archive is too small ([`SetupError::ArchiveTooSmall`])
/// - the archive never becomes readable ([`SetupError::FileNotReady`])
/// - extraction fails on every attempt ([`SetupError::RetriesExhausted`])
pub async fn install_for(
    config: &SetupConfig,
    platform: &PlatformIdentity,
) -> Result<InstallOutcome> {
    if !config.source_dir.is_dir() {
        return Err(SetupError::config(format!(
            "source directory {} does not exist",
            config.source_dir.display()
        ))
        .into());
    }

    let install_dir = config.install_dir().ok_or_else(|| {
        SetupError::config(format!(
            "no install directory configured; set {INSTALL_DIR_ENV} or pass --install-dir"
        ))
    })?;

    let target = InstallTarget::new(
        &config.package,
        platform,
        &config.source_dir,
        Some(install_dir),
    );
    let toolchain_dir = install_dir.join(&target.extracted_dir_name);

    if toolchain_dir.exists() {
        info!(
            "{} is already installed at {}",
            config.package,
            toolchain_dir.display()
        );
        return Ok(InstallOutcome::AlreadyInstalled {
            path: toolchain_dir,
        });
    }

    let tool = resolve_archiver(config.archiver.as_deref())?;

    tokio::fs::create_dir_all(install_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", install_dir.display()))?;

    let base_url = config.dist_url.as_deref().ok_or_else(|| {
        SetupError::config(format!(
            "no distribution URL configured; set {DIST_URL_ENV} or pass --dist-url"
        ))
    })?;
    let url = target.download_url(base_url);
    let archive = &target.archive_local_path;

    info!("Installing {} for {platform}", config.package);

    let downloader = Downloader::new(config.settle_delay)?;
    retry(&config.retry, "Download", || downloader.download(&url, archive)).await?;

    check_archive_size(archive, config.min_archive_size).await?;

    wait_until_ready(archive, &config.readiness).await?;

    retry(&config.retry, "Extraction", || {
        extract_archive(&tool, archive, install_dir)
    })
    .await?;

    info!(
        "{} installed at {}",
        config.package,
        toolchain_dir.display()
    );
    Ok(InstallOutcome::Installed {
        path: toolchain_dir,
    })
}

/// Locates the archive tool, either a path or a name on `PATH`.
///
/// # Errors
///
/// Returns [`SetupError::Config`] if no tool is configured or it cannot be found.
pub fn resolve_archiver(tool: Option<&Path>) -> Result<PathBuf> {
    let tool = tool.ok_or_else(|| {
        SetupError::config(format!(
            "no archive tool configured; set {ARCHIVER_ENV} or pass --archiver"
        ))
    })?;
    which::which(tool).map_err(|e| {
        SetupError::config(format!(
            "archive tool {} not found ({e}); install 7-Zip or set {ARCHIVER_ENV}",
            tool.display()
        ))
        .into()
    })
}

/// Rejects archives smaller than `minimum` bytes and removes them.
async fn check_archive_size(archive: &Path, minimum: u64) -> Result<()> {
    let size = tokio::fs::metadata(archive)
        .await
        .with_context(|| format!("Failed to read metadata of {}", archive.display()))?
        .len();

    if size < minimum {
        // The next run must download again.
        if let Err(e) = tokio::fs::remove_file(archive).await {
            warn!(
                "Failed to remove undersized archive {}: {e}",
                archive.display()
            );
        }
        return Err(SetupError::ArchiveTooSmall {
            path: archive.to_path_buf(),
            size,
            minimum,
        }
        .into());
    }

    info!("Archive size {size} bytes");
    Ok(())
}
