//! Output format argument group.
//!
//! ```bash
//! recon discover example.com --format json
//! recon tools -f text
//! ```

use clap::{Args, ValueEnum};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};

/// Output format for command results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary (default for terminals).
    #[default]
    Text,
    /// JSON for machine consumption (default for pipes).
    Json,
}

impl OutputFormat {
    /// Check if this format is machine-readable.
    #[must_use]
    pub const fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Text for interactive terminals, JSON for pipes and redirects.
    #[must_use]
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Text
        } else {
            Self::Json
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Shared `--format` flag.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputArgs {
    /// Output format (text, json).
    ///
    /// Defaults to text for terminals, json for pipes.
    #[arg(short = 'f', long = "format", value_enum, env = "RECON_OUTPUT_FORMAT")]
    pub format: Option<OutputFormat>,
}

impl OutputArgs {
    /// Explicit format, else terminal detection.
    #[must_use]
    pub fn resolve(&self) -> OutputFormat {
        self.format.unwrap_or_else(OutputFormat::detect)
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

    #[test]
    fn test_explicit_format_wins() {
        let args = OutputArgs {
            format: Some(OutputFormat::Json),
        };
        assert_eq!(args.resolve(), OutputFormat::Json);
        assert!(args.resolve().is_machine_readable());
    }

    #[test]
    fn test_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
