//! Ports command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;
use recon_core::ToolRunner;
use recon_core::pipeline::{PortScanOptions, scan_ports};

use super::{load_config, report_path, resolve_domain, write_report};
use crate::args::OutputFormat;

/// Execute the ports command
pub async fn execute(
    config_path: Option<&Path>,
    target: &str,
    full: bool,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(config_path)?;
    let target = resolve_domain(target)?;
    let path = report_path(&config, output, &target, "ports");

    let runner = ToolRunner::new(config);
    let report = scan_ports(&runner, &target, PortScanOptions { full }).await;
    write_report(&report, &path, format)
}
