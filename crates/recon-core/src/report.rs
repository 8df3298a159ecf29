//! Per-domain JSON reports.
//!
//! A [`Report`] holds whichever sections a pipeline produced; absent
//! sections are left out of the JSON entirely. Reports are written
//! atomically: a temp sibling is written first and renamed over the target,
//! so readers never see a partial file.
//!
//! ```rust
//! use recon_core::{Record, Report, ReportWriter};
//!
//! # fn main() -> recon_core::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("example_com_discovery.json");
//!
//! let report = Report {
//!     urls: Some(vec![Record::new("https://example.com/app.js")]),
//!     secrets: Some(Vec::new()),
//!     ..Report::default()
//! };
//! ReportWriter::write(&report, &path)?;
//! assert_eq!(ReportWriter::read(&path)?, report);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::adapters::{CmsInfo, Finding, OsMatch, Parameters, ServiceInfo, WafDetection};
use crate::discovery::{merge, merge_secrets};
use crate::whois::WhoisRecord;
use crate::{EnrichedHost, Error, HttpInfo, Record, Result, Secret};

/// Runs of non-word characters, replaced when building file names.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Result set of one pipeline run for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Scan target as given (port scans).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Deduplicated discovered URLs.
    #[serde(rename = "URLS", default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<Record>>,

    /// Secrets in source order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<Secret>>,

    /// Raw archived URLs from waybackurls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waybackurls: Option<Vec<String>>,

    /// Parsed WHOIS record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois: Option<WhoisRecord>,

    /// Hosts answering 200 / 403.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alive: Option<Vec<EnrichedHost>>,

    /// Hosts with no answer or 404.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead: Option<Vec<EnrichedHost>>,

    /// Hosts with any other status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<Vec<EnrichedHost>>,

    /// Open ports, ascending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_ports: Option<Vec<u16>>,

    /// HTTP details per open port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_tech: Option<BTreeMap<u16, HttpInfo>>,

    /// Service versions of the open ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceInfo>>,

    /// Best OS guess for the scanned host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsMatch>,

    /// Vulnerability scanner findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<Vec<Finding>>,

    /// Discovered HTTP parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,

    /// WordPress fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms: Option<CmsInfo>,

    /// Web application firewall detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waf: Option<WafDetection>,
}

impl Report {
    /// Number of URL records, zero when the section is absent.
    #[must_use]
    pub fn url_count(&self) -> usize {
        self.urls.as_ref().map_or(0, Vec::len)
    }

    /// Number of secrets, zero when the section is absent.
    #[must_use]
    pub fn secret_count(&self) -> usize {
        self.secrets.as_ref().map_or(0, Vec::len)
    }
}

/// Reads and writes report files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportWriter;

impl ReportWriter {
    /// Write `report` to `path` as 4-space indented JSON.
    ///
    /// Parent directories are created; an existing file is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file
    /// cannot be written or renamed into place.
    pub fn write(report: &Report, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut json = to_json(report)?;
        json.push('\n');

        // Write to a temp file first to ensure atomicity
        let tmp_path = tmp_path_for(path);
        if let Err(e) = fs::write(&tmp_path, &json) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        if let Err(e) = replace_with(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!(path = %path.display(), bytes = json.len(), "wrote report");
        Ok(())
    }

    /// Read a report back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the file does not exist, an I/O error
    /// if it cannot be read, and [`Error::Parse`] if it is not a report.
    pub fn read(path: &Path) -> Result<Report> {
        if !path.exists() {
            return Err(Error::NotFound(format!("report {}", path.display())));
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Parse(format!("{}: {e}", path.display())))
    }
}

/// Serialize with the 4-space indentation reports have always used.
fn to_json(report: &Report) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| Error::Serialization(e.to_string()))
}

/// Move `tmp_path` over `path`.
fn replace_with(tmp_path: &Path, path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    if path.is_file() {
        fs::remove_file(path)?;
    }
    fs::rename(tmp_path, path)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Merge the `URLS` and `secrets` sections of existing reports, in
/// argument order.
///
/// Files that cannot be read or parsed are skipped with a warning.
#[must_use]
pub fn merge_reports<P: AsRef<Path>>(paths: &[P]) -> Report {
    let mut url_sections = Vec::new();
    let mut secret_sections = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match ReportWriter::read(path) {
            Ok(report) => {
                url_sections.push(report.urls.unwrap_or_default());
                secret_sections.push(report.secrets.unwrap_or_default());
            },
            Err(e) => warn!(path = %path.display(), error = %e, "skipping report"),
        }
    }

    Report {
        urls: Some(merge(url_sections)),
        secrets: Some(merge_secrets(secret_sections)),
        ..Report::default()
    }
}

/// Replace every run of non-word characters with `_`.
///
/// ```rust
/// use recon_core::report::sanitize_filename;
///
/// assert_eq!(sanitize_filename("api.example.com"), "api_example_com");
/// assert_eq!(sanitize_filename("10.0.0.1:8080"), "10_0_0_1_8080");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    NON_WORD_RE.replace_all(name, "_").into_owned()
}

/// `{sanitized_domain}_{kind}_{YYYYmmdd_HHMMSS}.json`
#[must_use]
pub fn report_file_name(domain: &str, kind: &str, at: DateTime<Local>) -> String {
    format!(
        "{}_{kind}_{}.json",
        sanitize_filename(domain),
        at.format("%Y%m%d_%H%M%S")
    )
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
    use crate::Protocol;
    use crate::whois::WhoisValue;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn discovery_report() -> Report {
        Report {
            urls: Some(vec![
                Record::new("https://example.com/a.js"),
                Record::new("https://example.com/login.php"),
            ]),
            secrets: Some(vec!["google_api: AIza".into()]),
            waybackurls: Some(vec!["https://example.com/old".into()]),
            ..Report::default()
        }
    }

    #[test]
    fn test_write_read_roundtrip() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("out").join("nested").join("report.json");

        let mut report = discovery_report();
        report.whois = Some(WhoisRecord::from([(
            "Name Server".to_string(),
            WhoisValue::Many(vec!["A".into(), "B".into()]),
        )]));
        report.alive = Some(vec![EnrichedHost {
            id: 1,
            domain: "www.example.com".into(),
            protocol: Protocol::Https,
            url: "https://www.example.com".into(),
            status_code: Some(200),
            tls_version: Some("tls13".into()),
            content_length: Some(10),
            title: None,
            server: None,
            cdn: None,
        }]);
        report.open_ports = Some(vec![80, 443]);
        report.http_tech = Some(BTreeMap::from([(443, HttpInfo::default())]));
        report.services = Some(vec![ServiceInfo {
            port: 443,
            service: Some("https".into()),
            ..ServiceInfo::default()
        }]);
        report.os = Some(OsMatch {
            name: "Linux 5.x".into(),
            accuracy: Some(90),
        });

        ReportWriter::write(&report, &path)?;
        assert_eq!(ReportWriter::read(&path)?, report);
        assert!(!tmp_path_for(&path).exists());
        Ok(())
    }

    #[test]
    fn test_json_shape() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("report.json");
        ReportWriter::write(&discovery_report(), &path)?;

        let text = fs::read_to_string(&path)?;
        assert!(text.contains("\n    \"URLS\": ["));
        assert!(text.contains("\"type\": \"server_script\""));
        assert!(!text.contains("alive"));

        let value: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(value["URLS"][0]["url"], "https://example.com/a.js");
        assert_eq!(value["URLS"][0]["type"], "javascript");
        Ok(())
    }

    #[test]
    fn test_empty_sections_are_written() -> Result<()> {
        let report = Report {
            urls: Some(Vec::new()),
            secrets: Some(Vec::new()),
            ..Report::default()
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&report)?)?;
        assert_eq!(json, serde_json::json!({"URLS": [], "secrets": []}));
        Ok(())
    }

    #[test]
    fn test_scanner_sections_shape() -> Result<()> {
        let report = Report {
            target: Some("https://example.com".into()),
            http_tech: Some(BTreeMap::from([(
                80,
                HttpInfo {
                    status_code: Some(200),
                    ..HttpInfo::default()
                },
            )])),
            findings: Some(vec![Finding {
                tool: "nuclei".into(),
                id: "git-config".into(),
                name: None,
                severity: Some("medium".into()),
                url: None,
            }]),
            parameters: Some(Parameters {
                x8: vec!["debug".into()],
                ..Parameters::default()
            }),
            waf: Some(WafDetection {
                url: "https://example.com".into(),
                detected: Some(false),
                firewalls: Vec::new(),
            }),
            ..Report::default()
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&report)?)?;
        assert_eq!(json["http_tech"]["80"]["status_code"], 200);
        assert!(json.get("http").is_none());
        assert_eq!(json["findings"][0]["id"], "git-config");
        assert_eq!(json["parameters"]["x8"], serde_json::json!(["debug"]));
        assert_eq!(json["parameters"]["arjun_detected"], serde_json::json!([]));
        assert_eq!(json["waf"]["detected"], false);
        assert!(json.get("cms").is_none());
        Ok(())
    }

    #[test]
    fn test_null_host_fields_are_written() -> Result<()> {
        let report = Report {
            dead: Some(vec![EnrichedHost {
                id: 1,
                domain: "gone.example.com".into(),
                protocol: Protocol::Http,
                url: "http://gone.example.com".into(),
                status_code: None,
                tls_version: None,
                content_length: None,
                title: None,
                server: None,
                cdn: None,
            }]),
            ..Report::default()
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&report)?)?;
        assert!(json["dead"][0]["status_code"].is_null());
        assert_eq!(json["dead"][0]["protocol"], "http");
        Ok(())
    }

    #[test]
    fn test_overwrites_existing() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("report.json");
        fs::write(&path, "stale")?;

        ReportWriter::write(&Report::default(), &path)?;
        assert_eq!(fs::read_to_string(&path)?.trim(), "{}");
        Ok(())
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("report.json");
        fs::create_dir(&path)?;
        fs::write(path.join("keep.txt"), "earlier")?;

        assert!(ReportWriter::write(&discovery_report(), &path).is_err());
        assert!(!tmp_path_for(&path).exists());
        assert_eq!(fs::read_to_string(path.join("keep.txt"))?, "earlier");
        Ok(())
    }

    #[test]
    fn test_read_errors() -> Result<()> {
        let temp = TempDir::new()?;
        let missing = ReportWriter::read(&temp.path().join("missing.json")).unwrap_err();
        assert_eq!(missing.category(), "not_found");

        let bad = temp.path().join("bad.json");
        fs::write(&bad, "{\"URLS\": 3}")?;
        assert_eq!(ReportWriter::read(&bad).unwrap_err().category(), "parse");
        Ok(())
    }

    #[test]
    fn test_merge_reports_dedups_across_files() -> Result<()> {
        let temp = TempDir::new()?;
        let first = temp.path().join("urls.json");
        let second = temp.path().join("js.json");
        let broken = temp.path().join("broken.json");

        ReportWriter::write(
            &Report {
                urls: Some(vec![
                    Record::new("https://example.com/a.js"),
                    Record::new("https://example.com/b"),
                ]),
                secrets: Some(vec!["k: v".into()]),
                ..Report::default()
            },
            &first,
        )?;
        ReportWriter::write(
            &Report {
                urls: Some(vec![
                    Record::new("https://example.com/b"),
                    Record::new("https://example.com/c.css"),
                ]),
                secrets: Some(vec!["k: v".into()]),
                ..Report::default()
            },
            &second,
        )?;
        fs::write(&broken, "not json")?;

        let merged = merge_reports(&[&first, &broken, &second]);
        let urls: Vec<_> = merged
            .urls
            .as_ref()
            .unwrap()
            .iter()
            .map(|r| r.url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/a.js",
                "https://example.com/b",
                "https://example.com/c.css"
            ]
        );
        assert_eq!(merged.secret_count(), 2);
        Ok(())
    }

    #[test]
    fn test_report_file_name() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            report_file_name("shop.example.com", "discovery", at),
            "shop_example_com_discovery_20240309_070501.json"
        );
        assert_eq!(sanitize_filename("a--b..c"), "a_b_c");
        assert_eq!(sanitize_filename("under_score"), "under_score");
    }
}
