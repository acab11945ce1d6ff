#![warn(clippy::pedantic)]

//! # infc-setup
//!
//! Installs the prebuilt `infc` compiler toolchain that ships alongside a
//! package. The toolchain archive for the current OS and CPU family is
//! downloaded from the distribution server, checked, and extracted with 7-Zip.
//!
//! ## Subcommands
//!
//! - `install` - Download and extract the toolchain
//! - `uninstall` - Remove the archive and the extracted toolchain
//! - `status` - Show configuration and installation state
//!
//! ## Examples
//!
//! ```bash
//! INFC_DIST_URL=https://dist.example.com INFC_INSTALL_DIR=./compilers infc-setup install
//! infc-setup uninstall --install-dir ./compilers
//! infc-setup status
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{install, status, uninstall};
use infc_setup::config::LOG_ENV;
use tracing_subscriber::EnvFilter;

/// Installer for the infc compiler toolchain.
#[derive(Parser)]
#[command(
    name = "infc-setup",
    author,
    version,
    about = "Installs the infc compiler toolchain for this platform",
    after_help = "\
ENVIRONMENT VARIABLES:
    INFC_DIST_URL           Distribution server URL (required for install)
    INFC_INSTALL_DIR        Directory the toolchain is extracted into
    INFC_ARCHIVER           Archive tool (default: 7z)
    INFC_SETUP_LOG          Log filter (default: info)"
)]
pub struct Cli {
    /// Show debug logging.
    #[clap(short = 'v', long = "verbose", global = true, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the infc-setup CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Download and extract the toolchain.
    ///
    /// Does nothing if the toolchain is already extracted. A previously
    /// downloaded archive is reused.
    Install(install::InstallArgs),

    /// Remove the downloaded archive and the extracted toolchain.
    ///
    /// Missing files are not an error.
    Uninstall(uninstall::UninstallArgs),

    /// Show configuration and installation state.
    Status(status::StatusArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Install(args) => install::execute(&args).await,
        Commands::Uninstall(args) => uninstall::execute(&args).await,
        Commands::Status(args) => status::execute(&args),
    }
}
