//! Helpers shared by unit tests.

use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script named `fake-7z` into `dir`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-7z");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make fake tool executable");
    path
}

/// Number of lines in `log`, zero if it does not exist.
pub fn invocations(log: &Path) -> usize {
    std::fs::read_to_string(log).map_or(0, |s| s.lines().count())
}
