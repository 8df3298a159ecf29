//! wafw00f JSON output (`-f json -o <file>`).

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::Tool;

/// WAF section of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WafDetection {
    /// URL that was tested.
    pub url: String,
    /// Whether a firewall answered; `None` when wafw00f produced no result.
    pub detected: Option<bool>,
    /// Identified firewalls, `Name (Manufacturer)` when the vendor is known.
    pub firewalls: Vec<String>,
}

#[derive(Deserialize)]
struct WafEntry {
    #[serde(default)]
    detected: bool,
    firewall: Option<String>,
    manufacturer: Option<String>,
}

/// Parse a wafw00f JSON report for `url`.
///
/// ```rust
/// use recon_core::adapters::parse_wafw00f;
///
/// let report = r#"[{"url":"https://example.com","detected":true,
///     "firewall":"Cloudflare","manufacturer":"Cloudflare Inc."}]"#;
/// let waf = parse_wafw00f(report, "https://example.com");
/// assert_eq!(waf.detected, Some(true));
/// assert_eq!(waf.firewalls, ["Cloudflare (Cloudflare Inc.)"]);
/// ```
#[must_use]
pub fn parse_wafw00f(document: &str, url: &str) -> WafDetection {
    let mut detection = WafDetection {
        url: url.to_string(),
        ..WafDetection::default()
    };

    let entries = match serde_json::from_str::<Vec<WafEntry>>(document.trim()) {
        Ok(entries) if !entries.is_empty() => entries,
        Ok(_) => return detection,
        Err(e) => {
            trace!(tool = %Tool::Wafw00f, error = %e, "skipping malformed report");
            return detection;
        },
    };

    for entry in entries.into_iter().filter(|entry| entry.detected) {
        let name = match (entry.firewall, entry.manufacturer) {
            (Some(firewall), Some(vendor)) if !vendor.is_empty() && vendor != "Unknown" => {
                format!("{firewall} ({vendor})")
            },
            (Some(firewall), _) => firewall,
            (None, _) => continue,
        };
        if !detection.firewalls.contains(&name) {
            detection.firewalls.push(name);
        }
    }
    detection.detected = Some(!detection.firewalls.is_empty());
    detection
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

    const URL: &str = "https://example.com";

    #[test]
    fn test_generic_detection_has_no_vendor() {
        let waf = parse_wafw00f(
            r#"[{"url":"https://example.com","detected":true,"trigger_url":"https://example.com/?x=<script>","firewall":"Generic","manufacturer":"Unknown"}]"#,
            URL,
        );
        assert_eq!(waf.firewalls, vec!["Generic"]);
        assert_eq!(waf.detected, Some(true));
    }

    #[test]
    fn test_nothing_detected() {
        let waf = parse_wafw00f(
            r#"[{"url":"https://example.com","detected":false,"firewall":"None","manufacturer":"None"}]"#,
            URL,
        );
        assert_eq!(waf.detected, Some(false));
        assert!(waf.firewalls.is_empty());
    }

    #[test]
    fn test_missing_or_malformed_report_is_undecided() {
        for document in ["", "[]", "{\"url\":", "Checking https://example.com"] {
            let waf = parse_wafw00f(document, URL);
            assert_eq!(waf.detected, None, "{document}");
            assert_eq!(waf.url, URL);
        }
    }
}
