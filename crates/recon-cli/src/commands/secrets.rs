//! Secrets command implementation

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use recon_core::ToolRunner;
use recon_core::discovery::strip_scheme;
use recon_core::pipeline::scan_repository;

use super::{load_config, report_path, write_report};
use crate::args::OutputFormat;

/// Execute the secrets command
pub async fn execute(
    config_path: Option<&Path>,
    repo: &str,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let repo = repo.trim();
    let name = strip_scheme(repo);
    if name.is_empty() {
        bail!(recon_core::Error::InvalidUrl(format!(
            "invalid repository: '{repo}'"
        )));
    }

    let config = load_config(config_path)?;
    let path = report_path(&config, output, name, "secrets");

    let runner = ToolRunner::new(config);
    let report = scan_repository(&runner, repo).await;
    write_report(&report, &path, format)
}
