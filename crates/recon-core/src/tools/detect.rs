//! Locating tool executables.

use std::path::PathBuf;

use futures::future::join_all;
use tokio::process::Command;
use tracing::instrument;

use super::Tool;
use crate::{Config, Error, Result};

/// Installation state of one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Found, either at its configured path or in `PATH`.
    Ready {
        /// Resolved executable or script path.
        path: PathBuf,
    },
    /// Not configured and not in `PATH`, or the configured path is missing.
    NotInstalled,
}

impl ToolStatus {
    /// Whether the tool can be run.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Resolve the executable for `tool`.
///
/// A configured `[tools.<name>] path` wins and must exist; otherwise the
/// default binary name is looked up in `PATH`.
///
/// # Errors
///
/// Returns [`Error::ToolNotInstalled`] when the tool cannot be found.
#[instrument(level = "debug", skip(config))]
pub async fn locate(tool: Tool, config: &Config) -> Result<PathBuf> {
    if let Some(path) = config.tool(tool).and_then(|settings| settings.path.as_deref()) {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            tracing::debug!(path = %path.display(), "configured tool path does not exist");
            Err(not_installed(tool))
        };
    }

    find_in_path(tool.default_binary())
        .await
        .map_err(|_| not_installed(tool))
}

/// Find an executable in `PATH`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the lookup command fails or prints
/// nothing.
pub async fn find_in_path(binary: &str) -> Result<PathBuf> {
    // `which` on Unix, `where` on Windows
    #[cfg(windows)]
    let which_cmd = "where";
    #[cfg(not(windows))]
    let which_cmd = "which";

    let output = Command::new(which_cmd)
        .arg(binary)
        .output()
        .await
        .map_err(Error::Io)?;

    let missing = || Error::NotFound(format!("{binary} not found in PATH"));
    if !output.status.success() {
        return Err(missing());
    }

    let path = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    if path.is_empty() {
        return Err(missing());
    }
    Ok(PathBuf::from(path))
}

/// Check every tool concurrently.
#[instrument(level = "debug", skip(config))]
pub async fn detect_tools(config: &Config) -> Vec<(Tool, ToolStatus)> {
    let checks = Tool::ALL.into_iter().map(|tool| async move {
        let status = match locate(tool, config).await {
            Ok(path) => ToolStatus::Ready { path },
            Err(_) => ToolStatus::NotInstalled,
        };
        (tool, status)
    });
    join_all(checks).await
}

fn not_installed(tool: Tool) -> Error {
    Error::ToolNotInstalled {
        tool: tool.name().to_string(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::disallowed_macros,
    clippy::unnecessary_wraps
)]
mod tests {
    use super::*;
    use crate::config::ToolSettings;
    use tempfile::TempDir;

    fn config_with_path(tool: Tool, path: PathBuf) -> Config {
        let mut config = Config::default();
        config.tools.insert(
            tool.name().to_string(),
            ToolSettings {
                path: Some(path),
                ..ToolSettings::default()
            },
        );
        config
    }

    #[tokio::test]
    async fn test_configured_path_wins() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("gau");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        let config = config_with_path(Tool::Gau, script.clone());
        assert_eq!(locate(Tool::Gau, &config).await.unwrap(), script);
    }

    #[tokio::test]
    async fn test_missing_configured_path_is_not_installed() {
        let temp = TempDir::new().unwrap();
        let config = config_with_path(Tool::Naabu, temp.path().join("nope"));

        let err = locate(Tool::Naabu, &config).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotInstalled { ref tool } if tool == "naabu"));
    }

    #[tokio::test]
    async fn test_detect_reports_every_tool() {
        let temp = TempDir::new().unwrap();
        let config = config_with_path(Tool::Whois, temp.path().join("missing-whois"));

        let statuses = detect_tools(&config).await;
        assert_eq!(statuses.len(), Tool::ALL.len());
        let whois = statuses.iter().find(|(tool, _)| *tool == Tool::Whois).unwrap();
        assert_eq!(whois.1, ToolStatus::NotInstalled);
    }
}
