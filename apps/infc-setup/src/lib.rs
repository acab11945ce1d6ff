#![warn(clippy::pedantic)]

//! # infc-setup
//!
//! Installs the prebuilt `infc` compiler toolchain next to a package: the
//! archive matching the host platform is downloaded from the distribution
//! server, checked for a plausible size and unpacked with an external 7-Zip
//! compatible tool. Uninstalling removes both the archive and the unpacked
//! toolchain.
//!
//! ## Modules
//!
//! - [`config`] - The single configuration value of a run
//! - [`package`] - Package name and version from the descriptor
//! - [`toolchain`] - Platform detection, download, readiness, extraction, retry
//! - [`installer`] - The install, uninstall and status flows
//! - [`errors`] - Classified failures

pub mod config;
pub mod errors;
pub mod installer;
pub mod package;
pub mod toolchain;

#[cfg(all(test, unix))]
mod test_support;
