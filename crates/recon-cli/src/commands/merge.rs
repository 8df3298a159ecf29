//! Merge command implementation

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use recon_core::merge_reports;

use super::write_report;
use crate::args::OutputFormat;
use crate::error::CliError;

/// Execute the merge command
///
/// Every input must exist; files that exist but do not parse are skipped
/// with a warning.
pub fn execute(reports: &[PathBuf], output: &Path, format: OutputFormat) -> Result<()> {
    if let Some(missing) = reports.iter().find(|p| !p.exists()) {
        return Err(CliError::not_found(anyhow!("report not found: {}", missing.display())).into());
    }

    let merged = merge_reports(reports);
    write_report(&merged, output, format)
}
