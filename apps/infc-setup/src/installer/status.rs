//! Read-only report on the state of an installation.
//!
//! Used by the `status` command. None of the checks touch the network or
//! modify the filesystem, and missing configuration is reported rather than
//! treated as an error.

use crate::config::{ARCHIVER_ENV, DIST_URL_ENV, INSTALL_DIR_ENV, SetupConfig};
use crate::installer::install::resolve_archiver;
use crate::toolchain::{InstallTarget, PlatformIdentity};

/// What a status line means for a later `install` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    /// Install will do this work (download or extract).
    Pending,
    /// Install fails until this is fixed.
    Blocking,
}

/// One line of the status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
}

impl StatusCheck {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
        }
    }

    /// Marker printed in front of the line.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self.status {
            CheckStatus::Ok => "[OK]",
            CheckStatus::Pending => "[TODO]",
            CheckStatus::Blocking => "[FAIL]",
        }
    }
}

/// Every status line for one package on one platform.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub checks: Vec<StatusCheck>,
}

impl StatusReport {
    /// Returns true if any line would make `install` fail.
    #[must_use]
    pub fn has_blocking(&self) -> bool {
        self.checks.iter().any(|c| c.status == CheckStatus::Blocking)
    }

    /// Returns true if the extracted toolchain is present.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.get("toolchain")
            .is_some_and(|c| c.status == CheckStatus::Ok)
    }

    /// Looks up a line by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StatusCheck> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Builds the status report for `platform`.
#[must_use]
pub fn run_all_checks(config: &SetupConfig, platform: &PlatformIdentity) -> StatusReport {
    let target = InstallTarget::new(
        &config.package,
        platform,
        &config.source_dir,
        config.install_dir(),
    );

    StatusReport {
        checks: vec![
            StatusCheck::new("package", CheckStatus::Ok, config.package.qualified_name()),
            StatusCheck::new("platform", CheckStatus::Ok, platform.to_string()),
            check_dist_url(config, &target),
            check_archive(&target),
            check_toolchain(&target),
            check_archiver(config),
        ],
    }
}

fn check_dist_url(config: &SetupConfig, target: &InstallTarget) -> StatusCheck {
    match config.dist_url.as_deref() {
        Some(base) => StatusCheck::new("download URL", CheckStatus::Ok, target.download_url(base)),
        None => StatusCheck::new(
            "download URL",
            CheckStatus::Blocking,
            format!("Not configured. Set {DIST_URL_ENV}."),
        ),
    }
}

fn check_archive(target: &InstallTarget) -> StatusCheck {
    let path = &target.archive_local_path;
    match std::fs::metadata(path) {
        Ok(meta) => StatusCheck::new(
            "archive",
            CheckStatus::Ok,
            format!("{} ({} bytes)", path.display(), meta.len()),
        ),
        Err(_) => StatusCheck::new(
            "archive",
            CheckStatus::Pending,
            format!("Not downloaded ({})", path.display()),
        ),
    }
}

fn check_toolchain(target: &InstallTarget) -> StatusCheck {
    match target.extraction_path() {
        Some(path) if path.exists() => {
            StatusCheck::new(
                "toolchain",
                CheckStatus::Ok,
                format!("Installed at {}", path.display()),
            )
        }
        Some(path) => StatusCheck::new(
            "toolchain",
            CheckStatus::Pending,
            format!("Not installed ({})", path.display()),
        ),
        None => StatusCheck::new(
            "toolchain",
            CheckStatus::Blocking,
            format!("No install directory. Set {INSTALL_DIR_ENV}."),
        ),
    }
}

fn check_archiver(config: &SetupConfig) -> StatusCheck {
    match resolve_archiver(config.archiver.as_deref()) {
        Ok(path) => StatusCheck::new("archive tool", CheckStatus::Ok, path.display().to_string()),
        Err(_) => StatusCheck::new(
            "archive tool",
            CheckStatus::Blocking,
            format!("Not found. Install 7-Zip or set {ARCHIVER_ENV}."),
        ),
    }
}
