//! Vulns command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;
use recon_core::ToolRunner;
use recon_core::pipeline::scan_vulnerabilities;

use super::{load_config, report_path, resolve_url, write_report};
use crate::args::OutputFormat;

/// Execute the vulns command
pub async fn execute(
    config_path: Option<&Path>,
    target: &str,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(config_path)?;
    let (domain, url) = resolve_url(target)?;
    let path = report_path(&config, output, &domain, "vulns");

    let runner = ToolRunner::new(config);
    let report = scan_vulnerabilities(&runner, &url).await?;
    write_report(&report, &path, format)
}
