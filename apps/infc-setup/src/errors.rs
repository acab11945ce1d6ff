//! Error types for infc-setup.
//!
//! Most functions return `anyhow::Result` with human-readable context attached.
//! Failures that callers (and tests) need to tell apart are raised as a
//! [`SetupError`] at the root of the chain, so they can be recovered with
//! `anyhow::Error::downcast_ref::<SetupError>()`.

use std::path::PathBuf;
use thiserror::Error;

/// Classified failures of the install and uninstall pipeline.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A required setting is missing or points at something that does not exist.
    ///
    /// Configuration errors are fatal and never retried.
    #[error("configuration error: {message}")]
    Config {
        /// What is missing and how to provide it.
        message: String,
    },

    /// A required argument was empty or malformed.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// The package descriptor could not be used.
    #[error("package descriptor error: {message}")]
    Descriptor {
        /// Description of the problem.
        message: String,
    },

    /// The server answered with something other than `200 OK`.
    #[error("download failed with HTTP status {status}: {url}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The downloaded archive is smaller than the configured minimum.
    #[error(
        "downloaded archive {path} is only {size} bytes (minimum {minimum} bytes); \
         the transfer is likely truncated"
    )]
    ArchiveTooSmall {
        /// The archive on disk.
        path: PathBuf,
        /// Measured size in bytes.
        size: u64,
        /// Minimum accepted size in bytes.
        minimum: u64,
    },

    /// The file never became available for exclusive reading.
    #[error("file {path} was not ready after {attempts} attempts")]
    FileNotReady {
        /// The polled path.
        path: PathBuf,
        /// Number of polls performed.
        attempts: u32,
    },

    /// The archive tool exited with a non-zero code.
    #[error("archive tool exited with code {code}: {output}")]
    ExtractionFailed {
        /// Exit code of the tool, `-1` when terminated by a signal.
        code: i32,
        /// Combined standard output and standard error.
        output: String,
    },

    /// Every attempt of a retried operation failed.
    #[error("operation failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Message of the last underlying error.
        message: String,
    },
}

impl SetupError {
    /// Creates a new `Config` error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a new `Descriptor` error.
    #[must_use]
    pub fn descriptor(message: impl Into<String>) -> Self {
        Self::Descriptor {
            message: message.into(),
        }
    }

    /// Creates a new `HttpStatus` error.
    #[must_use]
    pub fn http_status(status: u16, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    /// Returns true for errors caused by configuration rather than transient faults.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Descriptor { .. })
    }
}
