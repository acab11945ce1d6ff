//! Uninstall command for the infc-setup CLI.
//!
//! Removes the downloaded archive and the extracted toolchain. Missing files
//! are fine and failures are reported as warnings; the command itself only
//! fails when the package cannot be determined.
//!
//! ## Usage
//!
//! ```bash
//! infc-setup uninstall
//! ```

use anyhow::Result;
use clap::Args;

use infc_setup::config::ConfigArgs;
use infc_setup::installer::{CleanupOutcome, uninstall};

/// Arguments for the uninstall command.
#[derive(Args)]
pub struct UninstallArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Executes the uninstall command.
///
/// # Errors
///
/// Returns an error if the package name or version cannot be determined.
pub async fn execute(args: &UninstallArgs) -> Result<()> {
    let config = args.config.resolve()?;

    println!("Uninstalling toolchain {}...", config.package);
    let report = uninstall(&config).await;

    print_line("archive", &report.archive);
    print_line("toolchain", &report.extracted);

    if report.has_failures() {
        eprintln!("Warning: some files could not be removed.");
    }

    Ok(())
}

fn print_line(what: &str, outcome: &CleanupOutcome) {
    match outcome {
        CleanupOutcome::Failed(message) => eprintln!("  {what}: {message}"),
        other => println!("  {what}: {}", other.label()),
    }
}
