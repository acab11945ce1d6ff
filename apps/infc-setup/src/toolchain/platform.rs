//! Host platform detection.
//!
//! The distribution server lays out prebuilt compilers as
//! `compilers/<platform>/<arch>/`, where `<platform>` is the host OS name and
//! `<arch>` is one of two CPU families. This module maps the host onto that
//! two-part identifier.

use std::fmt;

/// Architecture prefixes that identify an ARM CPU.
const ARM_MARKERS: [&str; 2] = ["arm", "aarch64"];

/// CPU family used in download paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchFamily {
    /// `x86` and `x86_64`, and anything that is not ARM.
    Intel,
    /// 32 and 64 bit ARM.
    Arm,
}

impl ArchFamily {
    /// Normalizes a CPU architecture string.
    ///
    /// Strings starting with an ARM marker map to [`ArchFamily::Arm`], all
    /// others to [`ArchFamily::Intel`].
    #[must_use]
    pub fn from_arch(arch: &str) -> Self {
        let arch = arch.to_ascii_lowercase();
        if ARM_MARKERS.iter().any(|marker| arch.starts_with(marker)) {
            Self::Arm
        } else {
            Self::Intel
        }
    }

    /// Returns the path segment used on the distribution server.
    #[must_use = "returns the arch string without side effects"]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intel => "intel",
            Self::Arm => "arm",
        }
    }
}

impl fmt::Display for ArchFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized platform identifier of the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformIdentity {
    /// OS tag, e.g. `linux`, `macos`, `windows`.
    pub platform: String,
    /// CPU family.
    pub arch: ArchFamily,
}

impl PlatformIdentity {
    /// Builds an identity from an OS name and a CPU architecture string.
    #[must_use]
    pub fn resolve(os: &str, arch: &str) -> Self {
        Self {
            platform: os.to_string(),
            arch: ArchFamily::from_arch(arch),
        }
    }

    /// Detects the identity of the running host.
    #[must_use]
    pub fn detect() -> Self {
        Self::resolve(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Returns the `<platform>/<arch>` segment of the download path.
    #[must_use]
    pub fn url_segment(&self) -> String {
        format!("{}/{}", self.platform, self.arch)
    }
}

impl fmt::Display for PlatformIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.arch)
    }
}
