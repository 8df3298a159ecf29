//! HTTP parameter discovery: arjun console output and the x8 JSON report.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::Tool;

/// `Extracted N parameters from response for testing: a, b, c`
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ARJUN_EXTRACTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Extracted \d+ parameters from response for testing: (.+)").unwrap()
});

/// `parameter detected: id, based on: ...`
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ARJUN_DETECTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"parameter detected: (\w+)").unwrap());

/// Parameters found for one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// Parameters x8 confirmed, first seen first.
    pub x8: Vec<String>,
    /// Candidates arjun extracted from the response body.
    pub arjun_extracted: Vec<String>,
    /// Parameters arjun confirmed.
    pub arjun_detected: Vec<String>,
}

/// Parse `arjun -u <url>` output into `(extracted, detected)`.
///
/// Only the first "Extracted" line counts; every "parameter detected" line
/// contributes one name.
///
/// ```rust
/// use recon_core::adapters::parse_arjun;
///
/// let out = vec![
///     "[+] Extracted 2 parameters from response for testing: q, page".to_string(),
///     "[✓] parameter detected: q, based on: body length".to_string(),
/// ];
/// let (extracted, detected) = parse_arjun(&out);
/// assert_eq!(extracted, ["q", "page"]);
/// assert_eq!(detected, ["q"]);
/// ```
#[must_use]
pub fn parse_arjun(lines: &[String]) -> (Vec<String>, Vec<String>) {
    let extracted = lines
        .iter()
        .find_map(|line| ARJUN_EXTRACTED_RE.captures(line))
        .map(|caps| {
            caps[1]
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let detected = lines
        .iter()
        .flat_map(|line| ARJUN_DETECTED_RE.captures_iter(line))
        .map(|caps| caps[1].to_string())
        .collect();

    (extracted, detected)
}

/// x8 has written found parameters both as bare names and as objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum FoundParam {
    Name(String),
    Detailed { name: String },
}

#[derive(Deserialize)]
struct X8Entry {
    #[serde(default)]
    found_params: Vec<FoundParam>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum X8Report {
    Many(Vec<X8Entry>),
    One(X8Entry),
}

/// Parse an x8 `-O json` report into unique parameter names.
///
/// A document that is not valid JSON yields nothing.
#[must_use]
pub fn parse_x8(document: &str) -> Vec<String> {
    let document = document.trim();
    if document.is_empty() {
        return Vec::new();
    }

    let entries = match serde_json::from_str::<X8Report>(document) {
        Ok(X8Report::Many(entries)) => entries,
        Ok(X8Report::One(entry)) => vec![entry],
        Err(e) => {
            trace!(tool = %Tool::X8, error = %e, "skipping malformed report");
            return Vec::new();
        },
    };

    let mut seen = HashSet::new();
    entries
        .into_iter()
        .flat_map(|entry| entry.found_params)
        .map(|param| match param {
            FoundParam::Name(name) | FoundParam::Detailed { name } => name,
        })
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
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
    fn test_arjun_extracted_and_detected() {
        let (extracted, detected) = parse_arjun(&lines(&[
            "    _",
            "[*] Scanning target: https://example.com",
            "[+] Extracted 3 parameters from response for testing: id, , debug,token",
            "[*] Logicforcing the URL endpoint",
            "[✓] parameter detected: debug, based on: http code",
            "[✓] parameter detected: id, based on: body length",
            "[+] Extracted 1 parameters from response for testing: ignored",
        ]));
        assert_eq!(extracted, vec!["id", "debug", "token"]);
        assert_eq!(detected, vec!["debug", "id"]);
    }

    #[test]
    fn test_arjun_nothing_found() {
        let (extracted, detected) =
            parse_arjun(&lines(&["[-] No parameters were discovered."]));
        assert!(extracted.is_empty());
        assert!(detected.is_empty());
    }

    #[test]
    fn test_x8_objects_and_names() {
        let report = r#"[
            {"method":"GET","url":"https://example.com/search","status":200,"size":512,
             "found_params":[{"name":"debug","value":null,"status":200,"size":640,"reason_kind":"Text"},
                             {"name":"q","value":null,"status":200,"size":700,"reason_kind":"Reflected"}],
             "injection_place":"Path"},
            {"method":"POST","url":"https://example.com/search","found_params":["debug","admin"]}
        ]"#;
        assert_eq!(parse_x8(report), vec!["debug", "q", "admin"]);
    }

    #[test]
    fn test_x8_single_object_and_garbage() {
        assert_eq!(parse_x8(r#"{"found_params":["token"]}"#), vec!["token"]);
        assert!(parse_x8("").is_empty());
        assert!(parse_x8("[{\"found_params\": [").is_empty());
    }
}
