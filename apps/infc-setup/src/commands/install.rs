//! Install command for the infc-setup CLI.
//!
//! ## Usage
//!
//! ```bash
//! INFC_DIST_URL=https://dist.example.com INFC_INSTALL_DIR=/opt/infc infc-setup install
//! infc-setup install --source-dir node_modules/infc --install-dir ./compilers
//! ```

use anyhow::Result;
use clap::Args;

use infc_setup::config::ConfigArgs;
use infc_setup::installer::{InstallOutcome, install};

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Executes the install command.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or any pipeline step
/// fails after its retries.
pub async fn execute(args: &InstallArgs) -> Result<()> {
    let config = args.config.resolve()?;

    match install(&config).await? {
        InstallOutcome::Installed { path } => {
            println!("Toolchain {} installed at {}", config.package, path.display());
        }
        InstallOutcome::AlreadyInstalled { path } => {
            println!(
                "Toolchain {} is already installed at {}",
                config.package,
                path.display()
            );
        }
    }

    Ok(())
}
