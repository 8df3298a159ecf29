//! WHOIS output parsing.
//!
//! `whois` prints loosely structured `Key: Value` lines. Keys that repeat
//! (name servers, status codes) are collected into lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A WHOIS field: one value, or all values of a repeated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WhoisValue {
    /// Key appeared once.
    One(String),
    /// Key appeared several times, in output order.
    Many(Vec<String>),
}

impl WhoisValue {
    fn push(&mut self, value: String) {
        match self {
            Self::One(first) => *self = Self::Many(vec![std::mem::take(first), value]),
            Self::Many(values) => values.push(value),
        }
    }
}

/// Parsed WHOIS record keyed by field name.
pub type WhoisRecord = BTreeMap<String, WhoisValue>;

/// Parse WHOIS text.
///
/// Lines are split on the first `:`; lines with an empty key or value
/// (section headers, URLs on their own) are skipped.
///
/// ```rust
/// use recon_core::whois::{WhoisValue, parse_whois};
///
/// let record = parse_whois("Registrar: Example Inc.\nName Server: A.NS\nName Server: B.NS\n");
/// assert_eq!(record["Registrar"], WhoisValue::One("Example Inc.".into()));
/// assert_eq!(
///     record["Name Server"],
///     WhoisValue::Many(vec!["A.NS".into(), "B.NS".into()])
/// );
/// ```
#[must_use]
pub fn parse_whois(output: &str) -> WhoisRecord {
    let mut record = WhoisRecord::new();
    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        match record.get_mut(key) {
            Some(existing) => existing.push(value.to_string()),
            None => {
                record.insert(key.to_string(), WhoisValue::One(value.to_string()));
            },
        }
    }
    record
}

/// Record reported when the lookup itself failed.
#[must_use]
pub fn whois_error(message: impl Into<String>) -> WhoisRecord {
    WhoisRecord::from([("error".to_string(), WhoisValue::One(message.into()))])
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

    const SAMPLE: &str = "\
   Domain Name: EXAMPLE.COM
   Registry Domain ID: 2336799_DOMAIN_COM-VRSN
   Registrar WHOIS Server: whois.iana.org
   Updated Date: 2024-08-14T07:01:34Z
   Domain Status: clientDeleteProhibited https://icann.org/epp#clientDeleteProhibited
   Domain Status: clientTransferProhibited https://icann.org/epp#clientTransferProhibited
   Domain Status: clientUpdateProhibited https://icann.org/epp#clientUpdateProhibited
   Name Server: A.IANA-SERVERS.NET
   Name Server: B.IANA-SERVERS.NET
   DNSSEC: signedDelegation
>>> Last update of whois database: 2024-10-16T10:00:00Z <<<

NOTICE: The expiration date displayed in this record is the date the
Registrar:
";

    #[test]
    fn test_parses_sample() {
        let record = parse_whois(SAMPLE);

        assert_eq!(record["Domain Name"], WhoisValue::One("EXAMPLE.COM".into()));
        // value keeps everything after the first colon
        assert_eq!(
            record["Updated Date"],
            WhoisValue::One("2024-08-14T07:01:34Z".into())
        );
        match &record["Domain Status"] {
            WhoisValue::Many(values) => assert_eq!(values.len(), 3),
            other => panic!("expected list, got {other:?}"),
        }
        assert_eq!(
            record["Name Server"],
            WhoisValue::Many(vec![
                "A.IANA-SERVERS.NET".into(),
                "B.IANA-SERVERS.NET".into()
            ])
        );
        assert!(!record.contains_key("Registrar"));
        assert!(record.contains_key(">>> Last update of whois database"));
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_whois("").is_empty());
        assert!(parse_whois("no colons here\n\n").is_empty());
    }

    #[test]
    fn test_serializes_untagged() {
        let record = parse_whois("A: 1\nB: 2\nB: 3\n");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"A":"1","B":["2","3"]}"#);
    }

    #[test]
    fn test_error_record() {
        let json = serde_json::to_value(whois_error("WHOIS lookup failed")).unwrap();
        assert_eq!(json["error"], "WHOIS lookup failed");
    }
}
