//! httpx output parsing: per-URL results for subdomains and per-port HTTP details.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;

use super::hosts::PortValue;
use super::{json_lines, text_lines};
use crate::{HttpInfo, Tool};

/// One requested URL with whatever metadata httpx reported.
///
/// URLs httpx could not reach carry only the url; every other field is
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResult {
    /// `scheme://host` as requested.
    pub url: String,
    /// HTTP status code.
    pub status_code: Option<u16>,
    /// Negotiated TLS version.
    pub tls_version: Option<String>,
    /// Response body length.
    pub content_length: Option<u64>,
    /// Page title.
    pub title: Option<String>,
    /// Web server banner.
    pub server: Option<String>,
    /// CDN name.
    pub cdn: Option<String>,
}

impl HttpResult {
    /// A result that failed before any response.
    #[must_use]
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct HttpxLine {
    url: Option<String>,
    input: Option<String>,
    status_code: Option<u16>,
    tls: Option<TlsInfo>,
    content_length: Option<u64>,
    title: Option<String>,
    webserver: Option<String>,
    cdn_name: Option<String>,
}

#[derive(Deserialize)]
struct TlsInfo {
    tls_version: Option<String>,
}

#[derive(Deserialize)]
struct PortLine {
    port: PortValue,
    status_code: Option<u16>,
    title: Option<String>,
    webserver: Option<String>,
    server: Option<String>,
    #[serde(default)]
    tech: Vec<String>,
}

/// Parse `httpx -json -v` output into one [`HttpResult`] per URL.
///
/// Successful results come from `stdout`, in output order. A URL reported
/// twice keeps its first position and its last metadata. Connection
/// failures are recovered from verbose `stderr` lines of the form
/// `... Failed ... Get '<url>' ...` and appended, first seen first, when no
/// successful result exists for them.
#[must_use]
pub fn parse_http_results(stdout: &[String], stderr: &[String]) -> Vec<HttpResult> {
    let mut results: Vec<HttpResult> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in json_lines::<HttpxLine>(Tool::Httpx, stdout) {
        let Some(url) = line.url.or(line.input).filter(|u| !u.is_empty()) else {
            continue;
        };
        let result = HttpResult {
            url: url.clone(),
            status_code: line.status_code,
            tls_version: line.tls.and_then(|tls| tls.tls_version),
            content_length: line.content_length,
            title: line.title,
            server: line.webserver,
            cdn: line.cdn_name,
        };
        match index.get(&url) {
            Some(&pos) => results[pos] = result,
            None => {
                index.insert(url, results.len());
                results.push(result);
            },
        }
    }

    let mut failed_seen = HashSet::new();
    for url in text_lines(stderr).filter_map(failed_url) {
        if !index.contains_key(url) && failed_seen.insert(url) {
            results.push(HttpResult::failed(url));
        }
    }

    results
}

/// The quoted URL in an httpx "Failed ... Get" verbose line.
fn failed_url(line: &str) -> Option<&str> {
    if !(line.contains("Failed") && line.contains("Get")) {
        return None;
    }
    line.split('\'').nth(1).filter(|url| !url.is_empty())
}

/// Parse `httpx -u <target> -p <ports> -json` output into HTTP details per
/// port.
///
/// A placeholder `"Loading"` title is treated as no title. The server
/// banner is read from `webserver`, falling back to `server`.
#[must_use]
pub fn parse_port_info(lines: &[String]) -> BTreeMap<u16, HttpInfo> {
    json_lines::<PortLine>(Tool::Httpx, lines)
        .filter_map(|line| {
            let port = line.port.get()?;
            let info = HttpInfo {
                status_code: line.status_code,
                title: line.title.filter(|title| title != "Loading"),
                server: line.webserver.or(line.server),
                tech: line.tech,
            };
            Some((port, info))
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
    fn test_result_fields() {
        let stdout = lines(&[
            r#"{"url":"https://api.example.com","input":"https://api.example.com","status_code":200,"tls":{"tls_version":"tls13"},"content_length":1024,"title":"API","webserver":"nginx","cdn_name":"cloudflare"}"#,
            r#"{"input":"http://old.example.com","status_code":301}"#,
        ]);
        let results = parse_http_results(&stdout, &[]);

        assert_eq!(
            results[0],
            HttpResult {
                url: "https://api.example.com".into(),
                status_code: Some(200),
                tls_version: Some("tls13".into()),
                content_length: Some(1024),
                title: Some("API".into()),
                server: Some("nginx".into()),
                cdn: Some("cloudflare".into()),
            }
        );
        assert_eq!(results[1].url, "http://old.example.com");
        assert_eq!(results[1].status_code, Some(301));
        assert_eq!(results[1].tls_version, None);
    }

    #[test]
    fn test_duplicate_url_keeps_position_takes_last_values() {
        let stdout = lines(&[
            r#"{"url":"https://a.example.com","status_code":500}"#,
            r#"{"url":"https://b.example.com","status_code":200}"#,
            r#"{"url":"https://a.example.com","status_code":200}"#,
        ]);
        let results = parse_http_results(&stdout, &[]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://a.example.com");
        assert_eq!(results[0].status_code, Some(200));
    }

    #[test]
    fn test_failures_from_stderr() {
        let stdout = lines(&[r#"{"url":"https://ok.example.com","status_code":200}"#]);
        let stderr = lines(&[
            "[DBG] Failed 'http://down.example.com': Get 'http://down.example.com': dial tcp: no such host",
            "[DBG] Failed 'https://ok.example.com': Get 'https://ok.example.com': timeout",
            "[DBG] Failed 'http://down.example.com': Get 'http://down.example.com': retry",
            "[INF] Current httpx version v1.6.0",
            "Failed without quotes Get",
        ]);
        let results = parse_http_results(&stdout, &stderr);

        let urls: Vec<_> = results.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://ok.example.com", "http://down.example.com"]);
        assert_eq!(results[1], HttpResult::failed("http://down.example.com"));
    }

    #[test]
    fn test_lines_without_url_are_skipped() {
        let stdout = lines(&[r#"{"status_code":200}"#, r#"{"url":""}"#, "not json"]);
        assert!(parse_http_results(&stdout, &[]).is_empty());
    }

    #[test]
    fn test_port_info() {
        let info = parse_port_info(&lines(&[
            r#"{"port":"443","status_code":200,"title":"Home","webserver":"nginx","tech":["Nginx","React"]}"#,
            r#"{"port":8080,"status_code":302,"title":"Loading","server":"Jetty"}"#,
            r#"{"status_code":200}"#,
        ]));

        assert_eq!(info.len(), 2);
        assert_eq!(
            info[&443],
            HttpInfo {
                status_code: Some(200),
                title: Some("Home".into()),
                server: Some("nginx".into()),
                tech: vec!["Nginx".into(), "React".into()],
            }
        );
        assert_eq!(info[&8080].title, None);
        assert_eq!(info[&8080].server.as_deref(), Some("Jetty"));
        assert!(info[&8080].tech.is_empty());
    }
}
