//! WordPress fingerprinting with wpscan (`--format json`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::Tool;

/// wpscan's abort message for sites that are up but not WordPress.
const NOT_WORDPRESS: &str = "not seem to be running WordPress";

/// CMS section of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmsInfo {
    /// `Some(true)` when wpscan completed, `Some(false)` when it reported
    /// the site is not WordPress, `None` when it could not tell.
    pub is_wordpress: Option<bool>,
    /// Detected WordPress version.
    pub version: Option<String>,
    /// Why wpscan stopped early, if it did.
    pub scan_aborted: Option<String>,
    /// The full wpscan JSON report.
    pub wpscan: Option<Value>,
}

impl CmsInfo {
    /// Whether wpscan was turned away with a 403 and is worth retrying with
    /// a random user agent.
    #[must_use]
    pub fn blocked(&self) -> bool {
        self.scan_aborted
            .as_deref()
            .is_some_and(|reason| reason.contains("403"))
    }
}

#[derive(Default, Deserialize)]
struct WpscanSummary {
    scan_aborted: Option<String>,
    version: Option<WpscanVersion>,
}

#[derive(Deserialize)]
struct WpscanVersion {
    number: Option<String>,
}

/// Parse wpscan JSON output.
///
/// Output that is not a JSON object leaves everything `None`.
///
/// ```rust
/// use recon_core::adapters::parse_wpscan;
///
/// let info = parse_wpscan(r#"{"version":{"number":"6.4.2","status":"latest"}}"#);
/// assert_eq!(info.is_wordpress, Some(true));
/// assert_eq!(info.version.as_deref(), Some("6.4.2"));
/// ```
#[must_use]
pub fn parse_wpscan(document: &str) -> CmsInfo {
    let value = match serde_json::from_str::<Value>(document.trim()) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => return CmsInfo::default(),
        Err(e) => {
            trace!(tool = %Tool::Wpscan, error = %e, "skipping malformed report");
            return CmsInfo::default();
        },
    };

    let summary = WpscanSummary::deserialize(&value).unwrap_or_default();
    let is_wordpress = match summary.scan_aborted.as_deref() {
        None => Some(true),
        Some(reason) if reason.contains(NOT_WORDPRESS) => Some(false),
        Some(_) => None,
    };

    CmsInfo {
        is_wordpress,
        version: summary.version.and_then(|v| v.number),
        scan_aborted: summary.scan_aborted,
        wpscan: Some(value),
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
    fn test_completed_scan() {
        let info = parse_wpscan(
            r#"{"target_url":"https://blog.example.com/","version":{"number":"5.8.1","status":"outdated"},
               "plugins":{"akismet":{"slug":"akismet"}}}"#,
        );
        assert_eq!(info.is_wordpress, Some(true));
        assert_eq!(info.version.as_deref(), Some("5.8.1"));
        assert!(!info.blocked());
        assert_eq!(info.wpscan.unwrap()["plugins"]["akismet"]["slug"], "akismet");
    }

    #[test]
    fn test_not_wordpress() {
        let info = parse_wpscan(
            r#"{"scan_aborted":"The remote website is up, but does not seem to be running WordPress."}"#,
        );
        assert_eq!(info.is_wordpress, Some(false));
        assert!(info.version.is_none());
        assert!(!info.blocked());
    }

    #[test]
    fn test_forbidden_is_blocked_and_undecided() {
        let info = parse_wpscan(r#"{"scan_aborted":"The target is responding with a 403"}"#);
        assert_eq!(info.is_wordpress, None);
        assert!(info.blocked());
    }

    #[test]
    fn test_unparseable_output() {
        assert_eq!(parse_wpscan("Scan Aborted: invalid option"), CmsInfo::default());
        assert_eq!(parse_wpscan("[1, 2]"), CmsInfo::default());
        assert_eq!(parse_wpscan(""), CmsInfo::default());
    }
}
