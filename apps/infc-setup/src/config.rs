//! Configuration for a single installer run.
//!
//! Every setting is read once, in `main`, into a [`SetupConfig`] which is then
//! passed by reference to the install, uninstall and status flows. Nothing
//! below this module reads the process environment.
//!
//! ## Environment Variables
//!
//! - `INFC_DIST_URL`: base URL of the distribution server
//! - `INFC_INSTALL_DIR`: directory toolchains are extracted into
//! - `INFC_ARCHIVER`: archive tool, a path or a name looked up on `PATH` (default `7z`)
//! - `INFC_SETUP_LOG`: log filter, e.g. `debug` (default `info`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::errors::SetupError;
use crate::package::{DESCRIPTOR_FILE, PackageInfo};
use crate::toolchain::download::DEFAULT_SETTLE_DELAY;
use crate::toolchain::readiness::ReadinessPolicy;
use crate::toolchain::retry::{DEFAULT_MAX_ATTEMPTS, RetryPolicy};

/// Environment variable holding the distribution server URL.
pub const DIST_URL_ENV: &str = "INFC_DIST_URL";

/// Environment variable holding the extraction root.
pub const INSTALL_DIR_ENV: &str = "INFC_INSTALL_DIR";

/// Environment variable holding the archive tool.
pub const ARCHIVER_ENV: &str = "INFC_ARCHIVER";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "INFC_SETUP_LOG";

/// Smallest archive accepted as a complete download (1 MiB).
pub const DEFAULT_MIN_ARCHIVE_SIZE: u64 = 1024 * 1024;

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Package directory holding the descriptor; the archive is downloaded here.
    #[clap(long = "source-dir", default_value = ".")]
    pub source_dir: PathBuf,

    /// Directory the toolchain is extracted into.
    #[clap(long = "install-dir", env = INSTALL_DIR_ENV)]
    pub install_dir: Option<PathBuf>,

    /// Base URL of the distribution server.
    #[clap(long = "dist-url", env = DIST_URL_ENV)]
    pub dist_url: Option<String>,

    /// Archive tool used for extraction.
    #[clap(long = "archiver", env = ARCHIVER_ENV, default_value = "7z")]
    pub archiver: PathBuf,

    /// Package name, overriding the descriptor.
    #[clap(long = "name")]
    pub name: Option<String>,

    /// Package version, overriding the descriptor.
    #[clap(long = "pkg-version")]
    pub version: Option<String>,

    /// Attempts for download and extraction.
    #[clap(long = "attempts", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub attempts: u32,

    /// Pause between attempts, in milliseconds.
    #[clap(long = "retry-delay-ms", default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Pause after the downloaded archive is closed, in milliseconds.
    #[clap(long = "settle-delay-ms", default_value_t = 200)]
    pub settle_delay_ms: u64,

    /// Smallest archive size in bytes accepted as a complete download.
    #[clap(long = "min-size", default_value_t = DEFAULT_MIN_ARCHIVE_SIZE)]
    pub min_size: u64,
}

impl ConfigArgs {
    /// Resolves the arguments into a [`SetupConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the package name or version cannot be determined
    /// from the flags or the descriptor in the source directory.
    pub fn resolve(&self) -> Result<SetupConfig> {
        let package = match (&self.name, &self.version) {
            (Some(name), Some(version)) => PackageInfo::new(name, version)?,
            (name, version) => {
                let descriptor = self.source_dir.join(DESCRIPTOR_FILE);
                if !self.source_dir.is_dir() {
                    return Err(SetupError::config(format!(
                        "source directory {} does not exist",
                        self.source_dir.display()
                    ))
                    .into());
                }
                let from_file = PackageInfo::from_descriptor(&descriptor)?;
                PackageInfo::new(
                    name.as_deref().unwrap_or(&from_file.name),
                    version.as_deref().unwrap_or(&from_file.version),
                )?
            }
        };

        Ok(SetupConfig {
            source_dir: self.source_dir.clone(),
            install_dir: self.install_dir.clone(),
            dist_url: self.dist_url.clone().filter(|url| !url.trim().is_empty()),
            archiver: Some(self.archiver.clone()).filter(|p| !p.as_os_str().is_empty()),
            package,
            retry: RetryPolicy::new(self.attempts, Duration::from_millis(self.retry_delay_ms)),
            readiness: ReadinessPolicy::default(),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            min_archive_size: self.min_size,
        })
    }
}

/// Everything the install, uninstall and status flows need to know.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Package directory; the archive is downloaded here.
    pub source_dir: PathBuf,
    /// Extraction root, required for install.
    pub install_dir: Option<PathBuf>,
    /// Distribution server URL, required for install.
    pub dist_url: Option<String>,
    /// Archive tool, required for install.
    pub archiver: Option<PathBuf>,
    /// Package being installed.
    pub package: PackageInfo,
    /// Retry policy for download and extraction.
    pub retry: RetryPolicy,
    /// Polling policy for the downloaded archive.
    pub readiness: ReadinessPolicy,
    /// Pause after the downloaded archive is closed.
    pub settle_delay: Duration,
    /// Smallest archive size accepted as a complete download.
    pub min_archive_size: u64,
}

impl SetupConfig {
    /// Creates a configuration with default policies and nothing optional set.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, package: PackageInfo) -> Self {
        Self {
            source_dir: source_dir.into(),
            install_dir: None,
            dist_url: None,
            archiver: None,
            package,
            retry: RetryPolicy::default(),
            readiness: ReadinessPolicy::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            min_archive_size: DEFAULT_MIN_ARCHIVE_SIZE,
        }
    }

    /// Returns the extraction root if configured.
    #[must_use]
    pub fn install_dir(&self) -> Option<&Path> {
        self.install_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> ConfigArgs {
        let mut argv = vec!["infc-setup"];
        argv.extend_from_slice(args);
        TestCli::parse_from(argv).config
    }

    #[test]
    fn flags_override_descriptor() {
        let args = parse(&[
            "--name",
            "@inferara/infc",
            "--pkg-version",
            "0.3.0",
            "--install-dir",
            "/opt/infc",
            "--dist-url",
            "https://dist.example.com",
            "--attempts",
            "5",
        ]);

        let config = args.resolve().unwrap();
        assert_eq!(config.package.qualified_name(), "infc@0.3.0");
        assert_eq!(config.install_dir(), Some(Path::new("/opt/infc")));
        assert_eq!(config.dist_url.as_deref(), Some("https://dist.example.com"));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.min_archive_size, DEFAULT_MIN_ARCHIVE_SIZE);
    }

    #[test]
    fn package_is_read_from_descriptor() {
        let temp = TempDir::new().unwrap();
        temp.child(DESCRIPTOR_FILE)
            .write_str("[package]\nname = \"@inferara/infc\"\nversion = \"0.1.0\"\n")
            .unwrap();
        let source = temp.path().to_str().unwrap();

        let config = parse(&["--source-dir", source, "--pkg-version", "0.1.1"])
            .resolve()
            .unwrap();

        assert_eq!(config.package.qualified_name(), "infc@0.1.1");
        assert_eq!(config.source_dir, temp.path());
    }

    #[test]
    fn missing_source_dir_is_a_config_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");

        let err = parse(&["--source-dir", missing.to_str().unwrap()])
            .resolve()
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::Config { .. })
        ));
    }

    #[test]
    fn defaults_match_policy_constants() {
        let config = SetupConfig::new(".", PackageInfo::new("infc", "0.1.0").unwrap());
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.readiness, ReadinessPolicy::default());
        assert_eq!(config.settle_delay, Duration::from_millis(200));
        assert_eq!(config.min_archive_size, 1_048_576);
        assert!(config.install_dir().is_none());
    }
}
