//! CLI error handling with semantic exit codes.
//!
//! Errors are categorized so that shell scripts can tell a bad argument
//! apart from a tool that could not run.
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Command completed successfully |
//! | 1 | `Internal` | Unexpected/internal error, local I/O failure |
//! | 2 | `Usage` | Invalid arguments or configuration |
//! | 3 | `NotFound` | Report file or other named resource not found |
//! | 5 | `Tool` | External tool missing or failed |
//! | 6 | `Timeout` | Operation timed out |
//! | 7 | `Integrity` | Report or tool output could not be parsed |
//!
//! ```bash
//! recon merge a.json b.json --output merged.json
//! case $? in
//!     0) echo "merged" ;;
//!     3) echo "missing report" ;;
//!     *) echo "other error" ;;
//! esac
//! ```

use std::fmt;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid arguments or configuration (exit code 2).
    ///
    /// Argument validation failures, unparseable domains, bad config files.
    Usage = 2,

    /// Requested resource not found (exit code 3).
    NotFound = 3,

    /// External tool missing or failed (exit code 5).
    Tool = 5,

    /// Operation timed out (exit code 6).
    Timeout = 6,

    /// Stored or produced data could not be parsed (exit code 7).
    Integrity = 7,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::Tool => "tool error",
            Self::Timeout => "timeout",
            Self::Integrity => "integrity error",
        }
    }

    /// Map a core error onto a category.
    #[must_use]
    pub const fn from_core(err: &recon_core::Error) -> Self {
        use recon_core::Error;

        match err {
            Error::Config(_) | Error::InvalidUrl(_) => Self::Usage,
            Error::NotFound(_) => Self::NotFound,
            Error::ToolNotInstalled { .. } | Error::ToolFailed { .. } => Self::Tool,
            Error::Timeout(_) => Self::Timeout,
            Error::Parse(_) | Error::Serialization(_) => Self::Integrity,
            Error::Io(_) | Error::Other(_) => Self::Internal,
        }
    }

    /// Infer the error category from an error message.
    ///
    /// Fallback for errors that are neither a [`CliError`] nor a core error.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            return Self::Timeout;
        }

        if msg_lower.contains("not installed") || msg_lower.contains("failed to start") {
            return Self::Tool;
        }

        if msg_lower.contains("not found")
            || msg_lower.contains("no such")
            || msg_lower.contains("does not exist")
        {
            return Self::NotFound;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("parse error")
            || msg_lower.contains("invalid json")
        {
            return Self::Integrity;
        }

        if msg_lower.contains("invalid argument")
            || msg_lower.contains("invalid domain")
            || msg_lower.contains("invalid value")
        {
            return Self::Usage;
        }

        Self::Internal
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` so the full context chain survives.
///
/// ```rust,ignore
/// use recon_cli::error::{CliError, ErrorCategory};
///
/// let err = CliError::not_found(anyhow::anyhow!("report a.json"));
/// assert_eq!(err.exit_code(), 3);
/// assert_eq!(err.category, ErrorCategory::NotFound);
/// ```
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::NotFound, source)
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// An explicit [`CliError`] wins, then a core error anywhere in the chain,
/// then message inference.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }

    if let Some(core_err) = err.chain().find_map(|e| e.downcast_ref::<recon_core::Error>()) {
        return ErrorCategory::from_core(core_err).exit_code();
    }

    ErrorCategory::infer_from_message(&err.to_string()).exit_code()
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
    use anyhow::{Context, anyhow};

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorCategory::Internal.exit_code(), 1);
        assert_eq!(ErrorCategory::Usage.exit_code(), 2);
        assert_eq!(ErrorCategory::NotFound.exit_code(), 3);
        assert_eq!(ErrorCategory::Tool.exit_code(), 5);
        assert_eq!(ErrorCategory::Timeout.exit_code(), 6);
        assert_eq!(ErrorCategory::Integrity.exit_code(), 7);
    }

    #[test]
    fn test_core_error_mapping() {
        use recon_core::Error;

        assert_eq!(
            ErrorCategory::from_core(&Error::Config("bad".into())),
            ErrorCategory::Usage
        );
        assert_eq!(
            ErrorCategory::from_core(&Error::ToolNotInstalled { tool: "gau".into() }),
            ErrorCategory::Tool
        );
        assert_eq!(
            ErrorCategory::from_core(&Error::Parse("x".into())),
            ErrorCategory::Integrity
        );
        assert_eq!(
            ErrorCategory::from_core(&Error::NotFound("report".into())),
            ErrorCategory::NotFound
        );
    }

    #[test]
    fn test_exit_code_from_cli_error() {
        let err: anyhow::Error = CliError::new(ErrorCategory::Tool, anyhow!("nmap")).into();
        assert_eq!(exit_code_from_error(&err), 5);

        let err: anyhow::Error = CliError::not_found(anyhow!("gone")).into();
        assert_eq!(exit_code_from_error(&err), 3);
    }

    #[test]
    fn test_exit_code_from_core_error_with_context() {
        let err = Err::<(), _>(recon_core::Error::Timeout("httpx".into()))
            .context("checking hosts")
            .unwrap_err();
        assert_eq!(exit_code_from_error(&err), 6);
    }

    #[test]
    fn test_infer_from_message() {
        assert_eq!(
            ErrorCategory::infer_from_message("Operation timed out"),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorCategory::infer_from_message("No such file or directory"),
            ErrorCategory::NotFound
        );
        assert_eq!(
            ErrorCategory::infer_from_message("something odd"),
            ErrorCategory::Internal
        );
    }
}
