//! Error types and handling for recon-core operations.
//!
//! Errors are categorized for easier handling and carry a recoverability hint
//! so pipelines can tell a flaky tool run apart from a broken setup.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading tool output files, writing reports
//! - **Parse Errors**: malformed tool output that cannot be skipped line-by-line
//! - **Configuration Errors**: invalid or unreadable config files
//! - **Tool Errors**: external binaries missing, failing, or timing out
//!
//! Note that most parse problems never surface as an [`Error`]: source
//! adapters drop malformed lines and keep going.
//!
//! ```rust
//! use recon_core::Error;
//!
//! let err = Error::ToolNotInstalled { tool: "gau".to_string() };
//! assert_eq!(err.category(), "tool");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for recon-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers report writes, directory creation and reading previously
    /// written reports. The underlying `std::io::Error` is preserved.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing operation failed.
    ///
    /// Only raised for whole-document inputs (an ffuf result file, a report
    /// being merged). Line-oriented tool output is skipped instead.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL or domain argument is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation timed out.
    ///
    /// Raised when an external tool exceeds its configured timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// External tool is not installed or not in PATH.
    ///
    /// ## Resolution
    ///
    /// Install the tool or point `[tools.<name>] path` at it in the config.
    #[error("{tool} not installed (not found in PATH or configured path)")]
    ToolNotInstalled {
        /// Name of the missing tool.
        tool: String,
    },

    /// External tool ran but failed.
    ///
    /// ## Recoverability
    ///
    /// Typically recoverable - remote data sources behind these tools are
    /// often rate limited or briefly unavailable.
    #[error("{tool} failed: {reason}")]
    ToolFailed {
        /// Name of the tool that failed.
        tool: String,
        /// Exit status or stderr excerpt.
        reason: String,
    },

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for timeouts, tool failures and temporary I/O issues,
    /// `false` for permanent problems such as a missing binary or bad config.
    ///
    /// ```rust
    /// use recon_core::Error;
    ///
    /// assert!(Error::Timeout("httpx".into()).is_recoverable());
    /// assert!(!Error::Config("bad toml".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::ToolFailed { .. } => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Used as a structured field when logging and by the CLI to choose an
    /// exit code.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::ToolNotInstalled { .. } | Self::ToolFailed { .. } => "tool",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::disallowed_macros,
    clippy::unwrap_used,
    clippy::unnecessary_wraps
)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let err = Error::ToolFailed {
            tool: "gospider".to_string(),
            reason: "exit status 2".to_string(),
        };
        assert_eq!(err.to_string(), "gospider failed: exit status 2");

        let err = Error::ToolNotInstalled {
            tool: "ffuf".to_string(),
        };
        assert!(err.to_string().starts_with("ffuf not installed"));

        let err = Error::Parse("unexpected token".to_string());
        assert!(err.to_string().contains("Parse error"));
        assert!(err.to_string().contains("unexpected token"));

        let err = Error::Other("plain".to_string());
        assert_eq!(err.to_string(), "plain");
    }

    #[test]
    fn test_error_from_io_error() {
        let error: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        match error {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied),
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: Error = json_err.into();
        assert_eq!(error.category(), "serialization");
    }

    #[test]
    fn test_error_categories() {
        let cases = vec![
            (Error::Io(io::Error::other("test")), "io"),
            (Error::Parse("test".to_string()), "parse"),
            (Error::Config("test".to_string()), "config"),
            (Error::NotFound("test".to_string()), "not_found"),
            (Error::InvalidUrl("test".to_string()), "invalid_url"),
            (Error::Timeout("test".to_string()), "timeout"),
            (Error::Serialization("test".to_string()), "serialization"),
            (
                Error::ToolNotInstalled {
                    tool: "gau".to_string(),
                },
                "tool",
            ),
            (
                Error::ToolFailed {
                    tool: "gau".to_string(),
                    reason: "x".to_string(),
                },
                "tool",
            ),
            (Error::Other("test".to_string()), "other"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.category(), expected);
        }
    }

    #[test]
    fn test_error_recoverability() {
        let recoverable = vec![
            Error::Io(io::Error::new(io::ErrorKind::TimedOut, "timeout")),
            Error::Io(io::Error::new(io::ErrorKind::Interrupted, "interrupted")),
            Error::Timeout("httpx".to_string()),
            Error::ToolFailed {
                tool: "subfinder".to_string(),
                reason: "rate limited".to_string(),
            },
        ];
        let permanent = vec![
            Error::Io(io::Error::new(io::ErrorKind::NotFound, "not found")),
            Error::Parse("bad".to_string()),
            Error::Config("bad".to_string()),
            Error::InvalidUrl("bad".to_string()),
            Error::ToolNotInstalled {
                tool: "naabu".to_string(),
            },
        ];

        for error in recoverable {
            assert!(error.is_recoverable(), "Expected {error:?} to be recoverable");
        }
        for error in permanent {
            assert!(!error.is_recoverable(), "Expected {error:?} to be permanent");
        }
    }

    proptest! {
        #[test]
        fn test_message_preserved(msg in "[a-zA-Z0-9 ]{1,40}") {
            let err = Error::Config(msg.clone());
            prop_assert!(err.to_string().contains(&msg));
            prop_assert_eq!(err.category(), "config");
        }
    }
}
