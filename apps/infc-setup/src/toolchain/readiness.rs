//! Waiting for a freshly written file to become readable.
//!
//! After a download stream reports completion, the archive may still be held
//! by the OS, an indexer or an antivirus scanner for a short while. Handing it
//! to the archive tool in that window fails with sharing or permission errors.
//! [`wait_until_ready`] polls until the file can be opened exclusively.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::errors::SetupError;

/// Default number of polls.
pub const DEFAULT_MAX_POLLS: u32 = 10;

/// Default pause between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Windows `ERROR_SHARING_VIOLATION` and `ERROR_LOCK_VIOLATION`.
#[cfg(windows)]
const WINDOWS_BUSY_CODES: [i32; 2] = [32, 33];

/// Polling bounds for [`wait_until_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Number of open attempts before giving up. Zero is treated as one.
    pub max_polls: u32,
    /// Pause between attempts.
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_polls: DEFAULT_MAX_POLLS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Waits until `path` can be opened for exclusive reading.
///
/// # Errors
///
/// Returns [`SetupError::FileNotReady`] when the file is still busy, missing
/// or inaccessible after `policy.max_polls` attempts, or the underlying I/O
/// error for any other failure.
pub async fn wait_until_ready(path: &Path, policy: &ReadinessPolicy) -> Result<()> {
    wait_until_ready_with(path, policy, try_open_exclusive).await
}

/// Same as [`wait_until_ready`] with a caller-supplied probe.
///
/// The probe is called once per poll and must release whatever it acquired
/// before returning.
///
/// # Errors
///
/// See [`wait_until_ready`].
pub async fn wait_until_ready_with<P>(
    path: &Path,
    policy: &ReadinessPolicy,
    mut probe: P,
) -> Result<()>
where
    P: FnMut(&Path) -> io::Result<()>,
{
    let max_polls = policy.max_polls.max(1);

    for attempt in 1..=max_polls {
        match probe(path) {
            Ok(()) => {
                debug!("{} is ready (poll {attempt})", path.display());
                return Ok(());
            }
            Err(e) if is_transient(&e) => {
                debug!(
                    "{} not ready yet (poll {attempt}/{max_polls}): {e}",
                    path.display()
                );
                if attempt < max_polls {
                    tokio::time::sleep(policy.interval).await;
                }
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open {}", path.display()));
            }
        }
    }

    Err(SetupError::FileNotReady {
        path: path.to_path_buf(),
        attempts: max_polls,
    }
    .into())
}

/// Opens `path` exclusively and releases it again.
///
/// On Unix this takes a non-blocking exclusive advisory lock, on Windows the
/// file is opened with no sharing allowed.
///
/// # Errors
///
/// Returns the open or lock error. A held lock is reported as
/// [`io::ErrorKind::WouldBlock`].
pub fn try_open_exclusive(path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;

        let file = std::fs::OpenOptions::new()
            .read(true)
            .share_mode(0)
            .open(path)?;
        drop(file);
        Ok(())
    }

    #[cfg(not(windows))]
    {
        let file = std::fs::File::open(path)?;
        match file.try_lock() {
            Ok(()) => {
                file.unlock()?;
                Ok(())
            }
            Err(std::fs::TryLockError::WouldBlock) => Err(io::ErrorKind::WouldBlock.into()),
            Err(std::fs::TryLockError::Error(e)) => Err(e),
        }
    }
}

/// Busy, missing and permission-denied files may clear up on their own.
fn is_transient(err: &io::Error) -> bool {
    #[cfg(windows)]
    {
        if err
            .raw_os_error()
            .is_some_and(|code| WINDOWS_BUSY_CODES.contains(&code))
        {
            return true;
        }
    }

    matches!(
        err.kind(),
        io::ErrorKind::NotFound
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::ResourceBusy
    )
}
