//! Vulnerability scanner output: nuclei JSON lines and the nikto JSON
//! report.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::{Adapted, SourceAdapter, json_lines};
use crate::Tool;

/// One issue reported by a scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Reporting tool (`nuclei`, `nikto`).
    pub tool: String,
    /// Template id (nuclei) or test id (nikto).
    pub id: String,
    /// Human-readable description.
    pub name: Option<String>,
    /// Severity as the scanner rates it; nikto has none.
    pub severity: Option<String>,
    /// Where the issue matched, as the scanner reported it.
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct NucleiLine {
    #[serde(rename = "template-id")]
    template_id: String,
    #[serde(default)]
    info: NucleiInfo,
    #[serde(rename = "matched-at")]
    matched_at: Option<String>,
    host: Option<String>,
}

#[derive(Default, Deserialize)]
struct NucleiInfo {
    name: Option<String>,
    severity: Option<String>,
}

/// `nuclei -u <url> -jsonl -silent`: one finding per line.
///
/// Lines without a `template-id` are skipped. No URL records are produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct NucleiAdapter;

impl SourceAdapter for NucleiAdapter {
    fn tool(&self) -> Tool {
        Tool::Nuclei
    }

    fn adapt(&self, lines: &[String], _domain: &str) -> Adapted {
        let findings = json_lines::<NucleiLine>(Tool::Nuclei, lines)
            .map(|line| Finding {
                tool: Tool::Nuclei.name().to_string(),
                id: line.template_id,
                name: line.info.name,
                severity: line.info.severity,
                url: line.matched_at.or(line.host),
            })
            .collect();

        Adapted {
            findings,
            ..Adapted::default()
        }
    }
}

/// nikto writes one object per scanned host; older releases write the
/// object bare, newer ones wrap it in an array.
#[derive(Deserialize)]
#[serde(untagged)]
enum NiktoReport {
    Hosts(Vec<NiktoHost>),
    Host(NiktoHost),
}

#[derive(Deserialize)]
struct NiktoHost {
    #[serde(default)]
    vulnerabilities: Vec<NiktoItem>,
}

#[derive(Deserialize)]
struct NiktoItem {
    id: Option<Value>,
    msg: Option<String>,
    url: Option<String>,
}

/// Parse a nikto `-Format json` report into findings.
///
/// A document that is not valid JSON yields no findings.
///
/// ```rust
/// use recon_core::adapters::parse_nikto;
///
/// let report = r#"{"host":"example.com","vulnerabilities":[
///     {"id":"999986","method":"GET","url":"/","msg":"Missing X-Frame-Options header"}
/// ]}"#;
/// let findings = parse_nikto(report);
/// assert_eq!(findings[0].id, "999986");
/// assert_eq!(findings[0].tool, "nikto");
/// ```
#[must_use]
pub fn parse_nikto(document: &str) -> Vec<Finding> {
    let document = document.trim();
    if document.is_empty() {
        return Vec::new();
    }

    let hosts = match serde_json::from_str::<NiktoReport>(document) {
        Ok(NiktoReport::Hosts(hosts)) => hosts,
        Ok(NiktoReport::Host(host)) => vec![host],
        Err(e) => {
            trace!(tool = %Tool::Nikto, error = %e, "skipping malformed report");
            return Vec::new();
        },
    };

    hosts
        .into_iter()
        .flat_map(|host| host.vulnerabilities)
        .filter_map(|item| {
            let id = match item.id? {
                Value::String(id) => id,
                Value::Number(id) => id.to_string(),
                _ => return None,
            };
            Some(Finding {
                tool: Tool::Nikto.name().to_string(),
                id,
                name: item.msg,
                severity: None,
                url: item.url,
            })
        })
        .collect()
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
    use pretty_assertions::assert_eq;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_nuclei_lines_become_findings() {
        let out = NucleiAdapter.adapt(
            &lines(&[
                r#"{"template-id":"git-config","info":{"name":"Git Config File Detection","severity":"medium","tags":["config","git"]},"type":"http","host":"https://example.com","matched-at":"https://example.com/.git/config"}"#,
                r#"{"template-id":"tech-detect","info":{"name":"Wappalyzer Technology Detection","severity":"info"},"host":"https://example.com"}"#,
            ]),
            "example.com",
        );

        assert_eq!(
            out.findings,
            vec![
                Finding {
                    tool: "nuclei".into(),
                    id: "git-config".into(),
                    name: Some("Git Config File Detection".into()),
                    severity: Some("medium".into()),
                    url: Some("https://example.com/.git/config".into()),
                },
                Finding {
                    tool: "nuclei".into(),
                    id: "tech-detect".into(),
                    name: Some("Wappalyzer Technology Detection".into()),
                    severity: Some("info".into()),
                    url: Some("https://example.com".into()),
                },
            ]
        );
        assert!(out.records.is_empty());
        assert!(out.secrets.is_empty());
    }

    #[test]
    fn test_nuclei_malformed_lines_are_skipped() {
        let out = NucleiAdapter.adapt(
            &lines(&[
                "[INF] Current nuclei version: v3.1.0",
                r#"{"info":{"name":"no template id"}}"#,
                r#"{"template-id":"cut-off","info":{"#,
                "",
                r#"{"template-id":"bare"}"#,
            ]),
            "example.com",
        );
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].id, "bare");
        assert_eq!(out.findings[0].severity, None);
    }

    #[test]
    fn test_nikto_array_of_hosts() {
        let report = r#"[
            {"host":"example.com","ip":"93.184.216.34","port":"443","banner":"nginx","vulnerabilities":[
                {"id":"999986","references":"","method":"GET","url":"/","msg":"Missing X-Frame-Options header"},
                {"id":600575,"method":"GET","url":"/admin/","msg":"Admin login page found"}
            ]},
            {"host":"example.com","port":"80"}
        ]"#;

        let findings = parse_nikto(report);
        let ids: Vec<_> = findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["999986", "600575"]);
        assert_eq!(findings[1].url.as_deref(), Some("/admin/"));
        assert_eq!(findings[1].name.as_deref(), Some("Admin login page found"));
    }

    #[test]
    fn test_nikto_garbage_yields_nothing() {
        assert!(parse_nikto("").is_empty());
        assert!(parse_nikto("- Nikto v2.5.0\n+ 0 host(s) tested").is_empty());
        assert!(parse_nikto(r#"{"vulnerabilities":[{"msg":"no id"}]}"#).is_empty());
    }
}
