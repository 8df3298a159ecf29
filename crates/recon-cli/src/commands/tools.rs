//! Tools command implementation

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use recon_core::tools::{ToolStatus, detect_tools};

use super::load_config;
use crate::args::OutputFormat;

/// Execute the tools command
pub async fn execute(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let statuses = detect_tools(&config).await;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = statuses
                .iter()
                .map(|(tool, status)| {
                    let path = match status {
                        ToolStatus::Ready { path } => Some(path.as_path()),
                        ToolStatus::NotInstalled => None,
                    };
                    serde_json::json!({
                        "tool": tool.name(),
                        "installed": status.is_ready(),
                        "path": path,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        },
        OutputFormat::Text => {
            for (tool, status) in &statuses {
                match status {
                    ToolStatus::Ready { path } => {
                        println!("{} {:<13} {}", "✓".green(), tool.name(), path.display());
                    },
                    ToolStatus::NotInstalled => {
                        println!("{} {:<13} {}", "✗".red(), tool.name(), "not installed".dimmed());
                    },
                }
            }
            let ready = statuses.iter().filter(|(_, s)| s.is_ready()).count();
            println!("\n{ready}/{} tools available", statuses.len());
        },
    }
    Ok(())
}
