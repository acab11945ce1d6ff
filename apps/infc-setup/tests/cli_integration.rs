#![warn(clippy::pedantic)]

//! Integration tests for the infc-setup CLI.
//!
//! These tests spawn the compiled `infc-setup` binary and check its exit code,
//! stdout and stderr. Every test runs in its own temporary directory with the
//! `INFC_*` variables removed so the host environment cannot leak in.
//!
//! ## Coverage
//!
//! 1. **Help**: top-level and per-command help
//! 2. **Install**: configuration errors, already-installed skip, end-to-end run
//!    against a local HTTP server and a fake archive tool (unix only)
//! 3. **Uninstall**: empty state, removal of archive and toolchain
//! 4. **Status**: report on an unconfigured and an installed package
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p infc-setup
//! ```

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const DESCRIPTOR: &str = "[package]\nname = \"@inferara/infc\"\nversion = \"0.1.0\"\n";

/// Returns an `infc-setup` command with a clean `INFC_*` environment.
fn infc_setup() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("infc-setup"));
    for var in [
        "INFC_DIST_URL",
        "INFC_INSTALL_DIR",
        "INFC_ARCHIVER",
        "INFC_SETUP_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Creates a package directory holding the descriptor.
fn package_dir(temp: &assert_fs::TempDir) -> assert_fs::fixture::ChildPath {
    let pkg = temp.child("pkg");
    pkg.child("infc-package.toml").write_str(DESCRIPTOR).unwrap();
    pkg
}

// -----------------------------------------------------------------------------
// Help
// -----------------------------------------------------------------------------

#[test]
fn help_lists_subcommands_and_environment() {
    infc_setup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("INFC_DIST_URL"));
}

#[test]
fn install_help_shows_options() {
    infc_setup()
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--install-dir"))
        .stdout(predicate::str::contains("--dist-url"))
        .stdout(predicate::str::contains("--archiver"));
}

#[test]
fn missing_subcommand_fails() {
    infc_setup().assert().failure();
}

// -----------------------------------------------------------------------------
// Install
// -----------------------------------------------------------------------------

#[test]
fn install_without_install_dir_is_a_config_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pkg = package_dir(&temp);

    infc_setup()
        .current_dir(pkg.path())
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("INFC_INSTALL_DIR"));
}

#[test]
fn install_without_descriptor_fails() {
    let temp = assert_fs::TempDir::new().unwrap();

    infc_setup()
        .current_dir(temp.path())
        .args(["install", "--install-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn install_with_missing_source_dir_fails() {
    let temp = assert_fs::TempDir::new().unwrap();

    infc_setup()
        .args(["install", "--name", "infc", "--pkg-version", "0.1.0"])
        .arg("--source-dir")
        .arg(temp.path().join("gone"))
        .arg("--install-dir")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn install_skips_existing_toolchain() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pkg = package_dir(&temp);
    temp.child("out/infc@0.1.0/bin").create_dir_all().unwrap();

    // No server and no archive tool: an installed toolchain needs neither.
    infc_setup()
        .current_dir(pkg.path())
        .env("INFC_INSTALL_DIR", temp.path().join("out"))
        .env("INFC_ARCHIVER", temp.path().join("no-such-7z"))
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("already installed"));
}

#[test]
fn install_without_archiver_fails_before_downloading() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pkg = package_dir(&temp);

    infc_setup()
        .current_dir(pkg.path())
        .env("INFC_INSTALL_DIR", temp.path().join("out"))
        .env("INFC_DIST_URL", "http://127.0.0.1:9")
        .env("INFC_ARCHIVER", temp.path().join("no-such-7z"))
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));

    pkg.child("infc@0.1.0.7z").assert(predicate::path::missing());
}

#[cfg(unix)]
mod end_to_end {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fake_7z(dir: &std::path::Path) -> std::path::PathBuf {
        // `x <archive> -y -o<dest>`: create the toolchain directory under <dest>.
        let script = "#!/bin/sh\ndest=\"${4#-o}\"\nmkdir -p \"$dest/infc@0.1.0/bin\"\n";
        let tool = dir.join("fake-7z");
        std::fs::write(&tool, script).unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        tool
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn install_downloads_and_extracts() {
        let server = MockServer::start().await;
        let os = std::env::consts::OS;
        let arch = if std::env::consts::ARCH.starts_with("aarch64")
            || std::env::consts::ARCH.starts_with("arm")
        {
            "arm"
        } else {
            "intel"
        };
        Mock::given(method("GET"))
            .and(path(format!("/compilers/{os}/{arch}/infc@0.1.0.7z")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 4096]))
            .expect(1)
            .mount(&server)
            .await;

        let temp = assert_fs::TempDir::new().unwrap();
        let pkg = package_dir(&temp);
        let tool = fake_7z(temp.path());
        let out = temp.path().join("out");

        let mut cmd = infc_setup();
        cmd.current_dir(pkg.path())
            .env("INFC_DIST_URL", server.uri())
            .env("INFC_INSTALL_DIR", &out)
            .env("INFC_ARCHIVER", &tool)
            .args(["install", "--min-size", "1024", "--settle-delay-ms", "0"]);
        let assert = tokio::task::spawn_blocking(move || cmd.assert())
            .await
            .unwrap();

        assert
            .success()
            .stdout(predicate::str::contains("installed at"));
        pkg.child("infc@0.1.0.7z").assert(predicate::path::is_file());
        temp.child("out/infc@0.1.0/bin")
            .assert(predicate::path::is_dir());
    }
}

// -----------------------------------------------------------------------------
// Uninstall
// -----------------------------------------------------------------------------

#[test]
fn uninstall_with_nothing_installed_succeeds() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pkg = package_dir(&temp);

    infc_setup()
        .current_dir(pkg.path())
        .env("INFC_INSTALL_DIR", temp.path().join("out"))
        .arg("uninstall")
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn uninstall_removes_archive_and_toolchain() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pkg = package_dir(&temp);
    pkg.child("infc@0.1.0.7z").write_binary(b"7z").unwrap();
    temp.child("out/infc@0.1.0/bin/infc")
        .write_binary(b"bin")
        .unwrap();

    infc_setup()
        .current_dir(pkg.path())
        .env("INFC_INSTALL_DIR", temp.path().join("out"))
        .arg("uninstall")
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    pkg.child("infc@0.1.0.7z").assert(predicate::path::missing());
    temp.child("out/infc@0.1.0").assert(predicate::path::missing());
    pkg.child("infc-package.toml")
        .assert(predicate::path::is_file());
}

#[test]
fn uninstall_without_install_dir_still_removes_archive() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pkg = package_dir(&temp);
    pkg.child("infc@0.1.0.7z").write_binary(b"7z").unwrap();

    infc_setup()
        .current_dir(pkg.path())
        .arg("uninstall")
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));

    pkg.child("infc@0.1.0.7z").assert(predicate::path::missing());
}

// -----------------------------------------------------------------------------
// Status
// -----------------------------------------------------------------------------

#[test]
fn status_reports_unconfigured_install() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pkg = package_dir(&temp);

    infc_setup()
        .current_dir(pkg.path())
        .env("INFC_ARCHIVER", temp.path().join("no-such-7z"))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("infc@0.1.0"))
        .stdout(predicate::str::contains("[FAIL]"))
        .stdout(predicate::str::contains("INFC_DIST_URL"));
}

#[test]
fn status_reports_installed_toolchain() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pkg = package_dir(&temp);
    temp.child("out/infc@0.1.0").create_dir_all().unwrap();

    infc_setup()
        .current_dir(pkg.path())
        .env("INFC_INSTALL_DIR", temp.path().join("out"))
        .env("INFC_DIST_URL", "https://dist.example.com")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed at"));
}
