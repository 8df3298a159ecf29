//! Adapters for URL-harvesting tools: gau, gospider, hakrawler,
//! waybackurls and ffuf.

use serde::Deserialize;
use tracing::trace;

use super::{Adapted, SourceAdapter, json_lines, text_lines};
use crate::discovery::{in_scope, is_absolute, normalize, strip_scheme};
use crate::{Record, Tool};

/// `gau --json`: one object per line with a `url` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct GauAdapter;

#[derive(Deserialize)]
struct GauLine {
    #[serde(default)]
    url: String,
}

impl SourceAdapter for GauAdapter {
    fn tool(&self) -> Tool {
        Tool::Gau
    }

    fn adapt(&self, lines: &[String], domain: &str) -> Adapted {
        let records = json_lines::<GauLine>(self.tool(), lines)
            .filter_map(|line| normalize(&line.url, domain))
            .map(Record::new)
            .collect();
        Adapted::records(records)
    }
}

/// `gospider --json`: `output` holds the found URL, `input` the crawl root.
///
/// Relative output is resolved against the crawl root host, then scoped
/// against the target domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct GospiderAdapter;

#[derive(Deserialize)]
struct GospiderLine {
    #[serde(default)]
    output: String,
    #[serde(default)]
    input: String,
}

impl SourceAdapter for GospiderAdapter {
    fn tool(&self) -> Tool {
        Tool::Gospider
    }

    fn adapt(&self, lines: &[String], domain: &str) -> Adapted {
        let records = json_lines::<GospiderLine>(self.tool(), lines)
            .filter_map(|line| {
                let output = line.output.trim();
                if output.is_empty() {
                    return None;
                }
                let url = if is_absolute(output) {
                    output.to_string()
                } else {
                    let base = match strip_scheme(&line.input) {
                        "" => domain,
                        host => host,
                    };
                    normalize(output, base)?
                };
                in_scope(&url, domain).then(|| Record::new(url))
            })
            .collect();
        Adapted::records(records)
    }
}

/// `hakrawler -json`: one object per line with an upper-case `URL` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct HakrawlerAdapter;

#[derive(Deserialize)]
struct HakrawlerLine {
    #[serde(rename = "URL", default)]
    url: String,
}

impl SourceAdapter for HakrawlerAdapter {
    fn tool(&self) -> Tool {
        Tool::Hakrawler
    }

    fn adapt(&self, lines: &[String], domain: &str) -> Adapted {
        let records = json_lines::<HakrawlerLine>(self.tool(), lines)
            .filter_map(|line| normalize(&line.url, domain))
            .map(Record::new)
            .collect();
        Adapted::records(records)
    }
}

/// `waybackurls`: one archived URL per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaybackAdapter;

impl SourceAdapter for WaybackAdapter {
    fn tool(&self) -> Tool {
        Tool::Waybackurls
    }

    fn adapt(&self, lines: &[String], domain: &str) -> Adapted {
        let records = text_lines(lines)
            .filter_map(|line| normalize(line, domain))
            .map(Record::new)
            .collect();
        Adapted::records(records)
    }
}

/// `ffuf -of json`: a single document with a `results` array.
///
/// The lines are joined back into one document before parsing; a document
/// that does not parse yields no records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfufAdapter;

#[derive(Deserialize)]
struct FfufDocument {
    #[serde(default)]
    results: Vec<FfufResult>,
}

#[derive(Deserialize)]
struct FfufResult {
    #[serde(default)]
    url: String,
}

impl SourceAdapter for FfufAdapter {
    fn tool(&self) -> Tool {
        Tool::Ffuf
    }

    fn adapt(&self, lines: &[String], domain: &str) -> Adapted {
        let document = lines.join("\n");
        if document.trim().is_empty() {
            return Adapted::default();
        }

        match serde_json::from_str::<FfufDocument>(&document) {
            Ok(doc) => Adapted::records(
                doc.results
                    .iter()
                    .filter_map(|result| normalize(&result.url, domain))
                    .map(Record::new)
                    .collect(),
            ),
            Err(e) => {
                trace!(tool = %self.tool(), error = %e, "ffuf output is not a JSON document");
                Adapted::default()
            },
        }
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
    use crate::Category;
    use pretty_assertions::assert_eq;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn urls(adapted: &Adapted) -> Vec<&str> {
        adapted.records.iter().map(|r| r.url.as_str()).collect()
    }

    #[test]
    fn test_gau_scopes_and_normalizes() {
        let out = GauAdapter.adapt(
            &lines(&[
                r#"{"url":"https://example.com/a.js"}"#,
                r#"{"url":"https://evil.com/b.js"}"#,
                r#"{"url":"/a.js"}"#,
                r#"{"url":""}"#,
                r#"{"status":200}"#,
                "garbage",
            ]),
            "example.com",
        );
        assert_eq!(
            urls(&out),
            vec!["https://example.com/a.js", "https://example.com/a.js"]
        );
        assert!(out.secrets.is_empty());
    }

    #[test]
    fn test_gospider_resolves_against_input_host() {
        let out = GospiderAdapter.adapt(
            &lines(&[
                r#"{"input":"https://shop.example.com/","output":"/cart.php","type":"url"}"#,
                r#"{"input":"https://example.com","output":"./static/app.js"}"#,
                r#"{"input":"https://example.com","output":"img/logo.png"}"#,
                r#"{"input":"https://example.com","output":"https://cdn.other.net/x.js"}"#,
                r#"{"input":"","output":"/robots.txt"}"#,
            ]),
            "example.com",
        );
        assert_eq!(
            urls(&out),
            vec![
                "https://shop.example.com/cart.php",
                "https://example.com/static/app.js",
                "https://example.com/img/logo.png",
                "https://example.com/robots.txt",
            ]
        );
        assert_eq!(out.records[0].category, Category::ServerScript);
        assert_eq!(out.records[2].category, Category::Image);
    }

    #[test]
    fn test_gospider_drops_relative_from_foreign_root() {
        let out = GospiderAdapter.adapt(
            &lines(&[r#"{"input":"https://partner.net","output":"/x"}"#]),
            "example.com",
        );
        assert!(out.records.is_empty());
    }

    #[test]
    fn test_hakrawler_reads_upper_case_field() {
        let out = HakrawlerAdapter.adapt(
            &lines(&[
                r#"{"Source":"href","URL":"https://example.com/login.aspx"}"#,
                r#"{"url":"https://example.com/lower"}"#,
            ]),
            "example.com",
        );
        assert_eq!(urls(&out), vec!["https://example.com/login.aspx"]);
    }

    #[test]
    fn test_wayback_plain_lines() {
        let out = WaybackAdapter.adapt(
            &lines(&[
                "https://example.com/old.pdf",
                "",
                "  https://example.com/feed.rss  ",
                "https://unrelated.org/",
            ]),
            "example.com",
        );
        assert_eq!(
            urls(&out),
            vec!["https://example.com/old.pdf", "https://example.com/feed.rss"]
        );
        assert_eq!(out.records[1].category, Category::Xml);
    }

    #[test]
    fn test_ffuf_document() {
        let doc = r#"{
            "commandline": "ffuf -u https://example.com/FUZZ",
            "results": [
                {"url": "https://example.com/admin", "status": 301},
                {"url": "https://example.com/backup.zip", "status": 200},
                {"status": 200}
            ]
        }"#;
        let out = FfufAdapter.adapt(&lines(&doc.lines().collect::<Vec<_>>()), "example.com");
        assert_eq!(
            urls(&out),
            vec!["https://example.com/admin", "https://example.com/backup.zip"]
        );
    }

    #[test]
    fn test_ffuf_invalid_document_is_empty() {
        assert!(FfufAdapter.adapt(&lines(&["{oops"]), "example.com").is_empty());
        assert!(FfufAdapter.adapt(&[], "example.com").is_empty());
    }
}
