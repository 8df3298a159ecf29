//! recon CLI - aggregate results from external recon tools into JSON
//! reports.
//!
//! The binary in `main.rs` only maps the outcome of [`run`] to an exit
//! code; everything else lives here so integration tests and the binary
//! share one code path.

use anyhow::Result;
use clap::Parser;

pub mod args;
mod cli;
mod commands;
pub mod error;
mod utils;

use crate::utils::initialize_logging;
use cli::{Cli, Commands, ConfigCommands};

/// Execute the recon CLI with the current process arguments.
///
/// # Errors
///
/// Returns an error if logging cannot be initialized or the command fails.
/// Tool failures inside a pipeline are logged, not returned.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;
    execute_command(cli).await
}

async fn execute_command(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Discover {
            domain,
            output,
            skip,
            format,
        } => commands::discover(config, &domain, output, skip, format.resolve()).await,
        Commands::Subdomains {
            domain,
            output,
            format,
        } => commands::enumerate_subdomains(config, &domain, output, format.resolve()).await,
        Commands::Ports {
            target,
            full,
            output,
            format,
        } => commands::scan_ports(config, &target, full, output, format.resolve()).await,
        Commands::Secrets {
            repo,
            output,
            format,
        } => commands::scan_repository(config, &repo, output, format.resolve()).await,
        Commands::Vulns {
            target,
            output,
            format,
        } => commands::scan_vulnerabilities(config, &target, output, format.resolve()).await,
        Commands::Params {
            target,
            output,
            format,
        } => commands::discover_parameters(config, &target, output, format.resolve()).await,
        Commands::Cms {
            target,
            output,
            format,
        } => commands::scan_cms(config, &target, output, format.resolve()).await,
        Commands::Waf {
            target,
            output,
            format,
        } => commands::detect_waf(config, &target, output, format.resolve()).await,
        Commands::Merge {
            reports,
            output,
            format,
        } => commands::merge(&reports, &output, format.resolve()),
        Commands::Tools { format } => commands::list_tools(config, format.resolve()).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => commands::show_config(config, format.resolve()),
            ConfigCommands::Path => commands::show_config_path(config),
        },
    }
}
