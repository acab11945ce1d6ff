//! Where a toolchain archive comes from and where it ends up.
//!
//! ## Layout
//!
//! ```text
//! <dist-url>/compilers/<platform>/<arch>/<name>@<version>.7z   # remote archive
//! <source-dir>/<name>@<version>.7z                             # downloaded archive
//! <install-dir>/<name>@<version>/                              # extracted toolchain
//! ```
//!
//! The extracted directory is named after the archive without its extension.
//! Its presence is what marks a toolchain as installed.

use std::path::{Path, PathBuf};

use crate::package::PackageInfo;
use crate::toolchain::platform::PlatformIdentity;

/// Extension of toolchain archives on the distribution server.
pub const ARCHIVE_EXTENSION: &str = "7z";

/// Paths and names derived from a package, a platform and the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// File name of the archive, e.g. `infc@0.1.0.7z`.
    pub archive_file_name: String,
    /// Root directory the archive is extracted into, if configured.
    pub destination_dir: Option<PathBuf>,
    /// Full path of the downloaded archive.
    pub archive_local_path: PathBuf,
    /// Name of the directory the archive unpacks to, e.g. `infc@0.1.0`.
    pub extracted_dir_name: String,
    /// Server-relative path of the archive.
    pub remote_path: String,
}

impl InstallTarget {
    /// Derives the target for `package` on `platform`.
    #[must_use]
    pub fn new(
        package: &PackageInfo,
        platform: &PlatformIdentity,
        source_dir: &Path,
        destination_dir: Option<&Path>,
    ) -> Self {
        let extracted_dir_name = package.qualified_name();
        let archive_file_name = format!("{extracted_dir_name}.{ARCHIVE_EXTENSION}");
        Self {
            archive_local_path: source_dir.join(&archive_file_name),
            destination_dir: destination_dir.map(Path::to_path_buf),
            remote_path: format!("compilers/{}/{archive_file_name}", platform.url_segment()),
            archive_file_name,
            extracted_dir_name,
        }
    }

    /// Returns the directory of the extracted toolchain, if a destination is configured.
    #[must_use]
    pub fn extraction_path(&self) -> Option<PathBuf> {
        self.destination_dir
            .as_ref()
            .map(|dir| dir.join(&self.extracted_dir_name))
    }

    /// Returns true if the extracted toolchain directory exists.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.extraction_path().is_some_and(|path| path.exists())
    }

    /// Builds the full download URL below `base_url`.
    #[must_use]
    pub fn download_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.remote_path)
    }
}
