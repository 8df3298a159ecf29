//! Discover command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;
use recon_core::pipeline::{DiscoverOptions, discover};
use recon_core::{Tool, ToolRunner};
use tracing::warn;

use super::{load_config, report_path, resolve_domain, write_report};
use crate::args::OutputFormat;

/// Execute the discover command
pub async fn execute(
    config_path: Option<&Path>,
    domain: &str,
    output: Option<PathBuf>,
    skip: Vec<Tool>,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(config_path)?;
    let domain = resolve_domain(domain)?;
    let path = report_path(&config, output, &domain, "discovery");

    for tool in skip.iter().filter(|t| !Tool::DISCOVERY_ORDER.contains(*t)) {
        warn!(%tool, "not a discovery tool, --skip has no effect");
    }

    let runner = ToolRunner::new(config);
    let report = discover(&runner, &domain, &DiscoverOptions::skipping(skip)).await?;
    write_report(&report, &path, format)
}
