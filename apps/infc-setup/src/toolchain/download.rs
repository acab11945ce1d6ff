//! Streaming HTTP download of toolchain archives.
//!
//! The archive is written straight to its final location. A partially written
//! file is never left behind: [`PartialFile`] removes it on every failure path,
//! including a non-200 status and errors in the middle of the stream.
//!
//! ## Progress
//!
//! When the server sends `Content-Length`, progress is logged in whole
//! percent steps, each step at most once.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::{StatusCode, Url};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::errors::SetupError;

/// Default pause after the archive file has been closed.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// User agent sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Byte accounting for a single transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSession {
    /// Expected size from `Content-Length`, if the server sent one.
    pub total_size: Option<u64>,
    /// Bytes written so far.
    pub downloaded_size: u64,
    /// Last whole percentage that was reported.
    pub last_reported_percent: Option<u8>,
}

impl DownloadSession {
    /// Starts accounting for a transfer of `total_size` bytes.
    #[must_use]
    pub fn new(total_size: Option<u64>) -> Self {
        Self {
            total_size,
            downloaded_size: 0,
            last_reported_percent: None,
        }
    }

    /// Records `len` more bytes.
    ///
    /// Returns the new whole percentage if it has not been reported before,
    /// `None` otherwise or when the total size is unknown.
    pub fn record(&mut self, len: u64) -> Option<u8> {
        self.downloaded_size += len;
        let percent = self.percent()?;
        if self.last_reported_percent == Some(percent) {
            return None;
        }
        self.last_reported_percent = Some(percent);
        Some(percent)
    }

    /// Current whole percentage, capped at 100.
    #[must_use]
    pub fn percent(&self) -> Option<u8> {
        let total = self.total_size.filter(|&total| total > 0)?;
        let percent = (u128::from(self.downloaded_size) * 100 / u128::from(total)).min(100);
        u8::try_from(percent).ok()
    }
}

/// Removes the file at `path` when dropped, unless [`PartialFile::commit`] was called.
///
/// Declare the guard before the file handle so the handle is closed first.
#[derive(Debug)]
pub struct PartialFile {
    path: PathBuf,
    committed: bool,
}

impl PartialFile {
    /// Guards `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            committed: false,
        }
    }

    /// Keeps the file.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.committed {
            match std::fs::remove_file(&self.path) {
                Ok(()) => debug!("Removed partial download {}", self.path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => debug!(
                    "Could not remove partial download {}: {e}",
                    self.path.display()
                ),
            }
        }
    }
}

/// Downloads archives over HTTP or HTTPS.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    settle_delay: Duration,
}

impl Downloader {
    /// Creates a downloader that waits `settle_delay` after closing each file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settle_delay: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            settle_delay,
        })
    }

    /// Downloads `url` to `dest` and returns the file name of `dest`.
    ///
    /// If `dest` already exists nothing is requested and its name is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `url` is not an `http` or `https` URL
    /// - the request fails or the status is not `200 OK`
    /// - reading the body or writing the file fails
    ///
    /// The partially written file is removed in every case.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<String> {
        let file_name = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SetupError::invalid_argument(format!(
                    "download destination has no file name: {}",
                    dest.display()
                ))
            })?;

        if tokio::fs::try_exists(dest)
            .await
            .with_context(|| format!("Failed to check {}", dest.display()))?
        {
            info!("{} already exists, skipping download", dest.display());
            return Ok(file_name);
        }

        let url = parse_download_url(url)?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let guard = PartialFile::new(dest);
        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create file: {}", dest.display()))?;

        info!("Downloading {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to connect to {url}"))?;

        if response.status() != StatusCode::OK {
            return Err(SetupError::http_status(response.status().as_u16(), url.as_str()).into());
        }

        let mut session = DownloadSession::new(response.content_length());
        debug!("Content-Length: {:?}", session.total_size);

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.with_context(|| format!("Failed to read chunk from {url}"))?;
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write to {}", dest.display()))?;

            if let Some(percent) = session.record(chunk.len() as u64) {
                info!("Downloading {file_name}: {percent}%");
            }
        }

        file.flush()
            .await
            .with_context(|| format!("Failed to flush {}", dest.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("Failed to sync {}", dest.display()))?;
        drop(file.into_std().await);
        guard.commit();

        info!(
            "Downloaded {} bytes to {}",
            session.downloaded_size,
            dest.display()
        );

        tokio::time::sleep(self.settle_delay).await;
        Ok(file_name)
    }
}

/// Parses `url` and rejects schemes other than `http` and `https`.
fn parse_download_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| SetupError::invalid_argument(format!("invalid download URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(SetupError::invalid_argument(format!(
            "unsupported URL scheme '{other}' in {url}"
        ))
        .into()),
    }
}
