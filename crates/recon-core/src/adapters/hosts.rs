//! Parsers for host enumeration (subfinder) and port scanning (naabu).

use std::collections::{BTreeSet, HashSet};

use serde::Deserialize;

use super::{json_lines, text_lines};
use crate::Tool;

/// A port number as scanners report it: naabu and httpx have both emitted
/// `"port": 443` and `"port": "443"` across versions.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    pub(crate) fn get(&self) -> Option<u16> {
        match self {
            Self::Number(port) => Some(*port),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize)]
struct NaabuLine {
    port: PortValue,
}

/// Parse `subfinder -silent` output into unique hostnames, first seen first.
#[must_use]
pub fn parse_hosts(lines: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    text_lines(lines)
        .filter(|host| seen.insert(*host))
        .map(str::to_string)
        .collect()
}

/// Parse `naabu -json` output into a sorted, duplicate-free port list.
///
/// Lines without a usable `port` field are skipped.
#[must_use]
pub fn parse_ports(lines: &[String]) -> Vec<u16> {
    json_lines::<NaabuLine>(Tool::Naabu, lines)
        .filter_map(|line| line.port.get())
        .collect::<BTreeSet<_>>()
        .into_iter()
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
    use proptest::prelude::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_hosts_trimmed_and_deduplicated() {
        let hosts = parse_hosts(&lines(&[
            "api.example.com",
            "  www.example.com ",
            "",
            "api.example.com",
            "mail.example.com",
        ]));
        assert_eq!(
            hosts,
            vec!["api.example.com", "www.example.com", "mail.example.com"]
        );
    }

    #[test]
    fn test_ports_accept_numbers_and_strings() {
        let ports = parse_ports(&lines(&[
            r#"{"host":"example.com","ip":"93.184.216.34","port":443}"#,
            r#"{"host":"example.com","port":"80"}"#,
            r#"{"host":"example.com","port":443}"#,
            r#"{"host":"example.com","port":"http"}"#,
            r#"{"host":"example.com"}"#,
            "[INF] Running CONNECT scan",
            r#"{"port":8080}"#,
        ]));
        assert_eq!(ports, vec![80, 443, 8080]);
    }

    #[test]
    fn test_ports_empty() {
        assert!(parse_ports(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn test_ports_sorted_and_unique(raw in prop::collection::vec(1u16..=65535, 0..40)) {
            let input: Vec<String> = raw.iter().map(|p| format!(r#"{{"port":{p}}}"#)).collect();
            let ports = parse_ports(&input);
            prop_assert!(ports.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(ports.len(), raw.iter().collect::<BTreeSet<_>>().len());
        }
    }
}
