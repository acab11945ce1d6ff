//! Package metadata for the toolchain being installed.
//!
//! The package directory carries a small descriptor naming the published
//! package and its version:
//!
//! ```toml
//! [package]
//! name = "@inferara/infc"
//! version = "0.1.0"
//! ```
//!
//! The organization scope is stripped from the name before it is used in
//! archive names and URLs.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::errors::SetupError;

/// File name of the package descriptor.
pub const DESCRIPTOR_FILE: &str = "infc-package.toml";

/// Scope prefix of published package names.
pub const PACKAGE_SCOPE: &str = "@inferara/";

#[derive(Debug, Deserialize)]
struct Descriptor {
    package: DescriptorPackage,
}

#[derive(Debug, Deserialize)]
struct DescriptorPackage {
    name: String,
    version: String,
}

/// Name and version of the toolchain package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Package name without the scope prefix.
    pub name: String,
    /// Semantic version string.
    pub version: String,
}

impl PackageInfo {
    /// Creates package info from a published name and a version.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Descriptor`] if the name is empty after stripping
    /// the scope, contains a path separator, or the version is not valid semver.
    pub fn new(name: &str, version: &str) -> Result<Self> {
        let name = name.trim();
        let name = name.strip_prefix(PACKAGE_SCOPE).unwrap_or(name);
        if name.is_empty() {
            return Err(SetupError::descriptor("package name is empty").into());
        }
        if name.contains(['/', '\\']) {
            return Err(
                SetupError::descriptor(format!("invalid package name '{name}'")).into(),
            );
        }

        let version = version.trim();
        semver::Version::parse(version).map_err(|e| {
            SetupError::descriptor(format!("invalid package version '{version}': {e}"))
        })?;

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    /// Reads the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its values
    /// are rejected by [`PackageInfo::new`].
    pub fn from_descriptor(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read package descriptor {}", path.display()))?;
        let descriptor: Descriptor = toml::from_str(&content).map_err(|e| {
            SetupError::descriptor(format!("failed to parse {}: {e}", path.display()))
        })?;
        Self::new(&descriptor.package.name, &descriptor.package.version)
    }

    /// Returns `<name>@<version>`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    #[test]
    fn scope_prefix_is_stripped() {
        let info = PackageInfo::new("@inferara/infc", "0.1.0").unwrap();
        assert_eq!(info.name, "infc");
        assert_eq!(info.qualified_name(), "infc@0.1.0");
    }

    #[test]
    fn unscoped_names_are_kept() {
        let info = PackageInfo::new("infc", "1.2.3-beta.1").unwrap();
        assert_eq!(info.to_string(), "infc@1.2.3-beta.1");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(PackageInfo::new("@inferara/", "0.1.0").is_err());
        assert!(PackageInfo::new("", "0.1.0").is_err());
        assert!(PackageInfo::new("../infc", "0.1.0").is_err());
        assert!(PackageInfo::new("infc", "latest").is_err());
    }

    #[test]
    fn reads_descriptor_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.child(DESCRIPTOR_FILE);
        file.write_str("[package]\nname = \"@inferara/infc\"\nversion = \"0.2.0\"\n")
            .unwrap();

        let info = PackageInfo::from_descriptor(file.path()).unwrap();
        assert_eq!(info.name, "infc");
        assert_eq!(info.version, "0.2.0");
    }

    #[test]
    fn malformed_descriptor_is_a_descriptor_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.child(DESCRIPTOR_FILE);
        file.write_str("[package]\nname = \"infc\"\n").unwrap();

        let err = PackageInfo::from_descriptor(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::Descriptor { .. })
        ));
    }

    #[test]
    fn missing_descriptor_fails() {
        let temp = TempDir::new().unwrap();
        let err = PackageInfo::from_descriptor(&temp.path().join(DESCRIPTOR_FILE)).unwrap_err();
        assert!(err.to_string().contains(DESCRIPTOR_FILE));
    }
}
