//! Archive extraction through an external 7-Zip compatible tool.
//!
//! The toolchain ships as a `.7z` archive, which is unpacked by running
//!
//! ```text
//! <tool> x <archive> -y -o<destination>
//! ```
//!
//! (`x` extracts with full paths, `-y` answers every prompt with yes so
//! existing files are overwritten, `-o` sets the output directory). Standard
//! output and standard error are captured and attached to the error when the
//! tool fails.

use std::ffi::OsString;
use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::SetupError;

/// Builds the argument list passed to the archive tool.
///
/// Paths are passed through unchanged, so non-UTF-8 names reach the tool intact.
#[must_use]
pub fn extract_args(archive_path: &Path, dest_dir: &Path) -> Vec<OsString> {
    let mut output_flag = OsString::from("-o");
    output_flag.push(dest_dir);
    vec![
        OsString::from("x"),
        archive_path.as_os_str().to_os_string(),
        OsString::from("-y"),
        output_flag,
    ]
}

/// Extracts `archive_path` into `dest_dir` with the archive tool at `tool`.
///
/// # Errors
///
/// Returns an error if:
/// - `archive_path` or `dest_dir` is empty ([`SetupError::InvalidArgument`])
/// - the tool cannot be started (the OS error, with the tool path as context)
/// - the tool exits with a non-zero code ([`SetupError::ExtractionFailed`]
///   with the exit code and the captured output)
pub async fn extract_archive(tool: &Path, archive_path: &Path, dest_dir: &Path) -> Result<()> {
    if archive_path.as_os_str().is_empty() {
        return Err(SetupError::invalid_argument("archive path must not be empty").into());
    }
    if dest_dir.as_os_str().is_empty() {
        return Err(SetupError::invalid_argument("destination directory must not be empty").into());
    }

    info!(
        "Extracting {} to {}",
        archive_path.display(),
        dest_dir.display()
    );

    let output = Command::new(tool)
        .args(extract_args(archive_path, dest_dir))
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("Failed to run archive tool {}", tool.display()))?;

    let combined = combined_output(&output);
    if output.status.success() {
        debug!("Archive tool output:\n{combined}");
        return Ok(());
    }

    Err(SetupError::ExtractionFailed {
        code: output.status.code().unwrap_or(-1),
        output: combined,
    }
    .into())
}

/// Joins standard output and standard error into one trimmed string.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    [stdout.trim(), stderr.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
