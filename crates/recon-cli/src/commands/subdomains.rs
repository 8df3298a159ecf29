//! Subdomains command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;
use recon_core::ToolRunner;
use recon_core::pipeline::enumerate_subdomains;

use super::{load_config, report_path, resolve_domain, write_report};
use crate::args::OutputFormat;

/// Execute the subdomains command
pub async fn execute(
    config_path: Option<&Path>,
    domain: &str,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(config_path)?;
    let domain = resolve_domain(domain)?;
    let path = report_path(&config, output, &domain, "scan");

    let runner = ToolRunner::new(config);
    let report = enumerate_subdomains(&runner, &domain).await;
    write_report(&report, &path, format)
}
