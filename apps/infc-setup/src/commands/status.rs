//! Status command for the infc-setup CLI.
//!
//! ## Usage
//!
//! ```bash
//! infc-setup status
//! ```

use anyhow::Result;
use clap::Args;

use infc_setup::config::ConfigArgs;
use infc_setup::installer::run_all_checks;
use infc_setup::toolchain::PlatformIdentity;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Executes the status command.
///
/// # Errors
///
/// Returns an error if the package name or version cannot be determined.
pub fn execute(args: &StatusArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let report = run_all_checks(&config, &PlatformIdentity::detect());

    for check in &report.checks {
        println!("  {} {}: {}", check.marker(), check.name, check.message);
    }

    println!();
    if report.has_blocking() {
        println!("Install is not possible until the failing checks are fixed.");
    } else if report.is_installed() {
        println!("The toolchain is installed.");
    } else {
        println!("Ready to install. Run 'infc-setup install'.");
    }

    Ok(())
}
