use serde::{Deserialize, Serialize};
use std::fmt;

use crate::discovery::classify;

/// Semantic category of a discovered URL, derived from its path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// `.js`, `.jsx`
    Javascript,
    /// `.json`
    Json,
    /// `.html`, `.htm`
    Html,
    /// `.css`, `.scss`, `.less`
    Css,
    /// Raster and vector images
    Image,
    /// Office documents and PDFs
    Document,
    /// `.xml`, `.rss`, `.atom`
    Xml,
    /// `.php`, `.asp`, `.aspx`, `.jsp`
    ServerScript,
    /// `.txt`, `.text`, `.log`
    Txt,
    /// Anything else
    Link,
}

impl Category {
    /// All categories in classification precedence order.
    pub const ALL: [Self; 10] = [
        Self::Javascript,
        Self::Css,
        Self::Json,
        Self::Txt,
        Self::Image,
        Self::Document,
        Self::Xml,
        Self::ServerScript,
        Self::Html,
        Self::Link,
    ];

    /// Stable snake_case name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Json => "json",
            Self::Html => "html",
            Self::Css => "css",
            Self::Image => "image",
            Self::Document => "document",
            Self::Xml => "xml",
            Self::ServerScript => "server_script",
            Self::Txt => "txt",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered resource reference.
///
/// The category is always computed from the URL, so two records with the
/// same URL carry the same category. Serialized as `{"url", "type"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Canonical absolute URL.
    pub url: String,
    /// Category derived from `url`.
    #[serde(rename = "type")]
    pub category: Category,
}

impl Record {
    /// Build a record, classifying the URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let category = classify(&url);
        Self { url, category }
    }
}

/// A credential or token reported by a source tool.
///
/// Either a raw line or a `key: value` pair; no further structure.
pub type Secret = String;

/// Scheme of a checked host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP
    Http,
    /// HTTP over TLS
    Https,
}

impl Protocol {
    /// Parse a URL scheme, returning `None` for anything but http/https.
    #[must_use]
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            _ => None,
        }
    }

    /// The URL scheme for this protocol.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A checked protocol+host combination with whatever metadata httpx
/// returned. Metadata is `None` when the request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedHost {
    /// Sequential 1-based id, stable only within one run.
    pub id: u32,
    /// Host part of the checked URL.
    pub domain: String,
    /// Scheme of the checked URL.
    pub protocol: Protocol,
    /// `protocol://domain`
    pub url: String,
    /// HTTP status code, `None` when the result failed.
    pub status_code: Option<u16>,
    /// Negotiated TLS version.
    pub tls_version: Option<String>,
    /// Response body length.
    pub content_length: Option<u64>,
    /// Page title.
    pub title: Option<String>,
    /// `Server` header as reported by httpx.
    pub server: Option<String>,
    /// CDN name, if httpx detected one.
    pub cdn: Option<String>,
}

/// Per-port HTTP details collected during a port scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpInfo {
    /// HTTP status code.
    pub status_code: Option<u16>,
    /// Page title.
    pub title: Option<String>,
    /// Web server banner.
    pub server: Option<String>,
    /// Detected technologies.
    #[serde(default)]
    pub tech: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_category_as_type() {
        let record = Record::new("https://example.com/app.js");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["url"], "https://example.com/app.js");
        assert_eq!(json["type"], "javascript");
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_category_names_match_serde() {
        for category in Category::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.as_str());
        }
    }

    #[test]
    fn test_protocol_from_scheme() {
        assert_eq!(Protocol::from_scheme("http"), Some(Protocol::Http));
        assert_eq!(Protocol::from_scheme("https"), Some(Protocol::Https));
        assert_eq!(Protocol::from_scheme("ftp"), None);
        assert_eq!(Protocol::from_scheme("HTTPS"), None);
    }

    #[test]
    fn test_enriched_host_keeps_null_fields() {
        let host = EnrichedHost {
            id: 1,
            domain: "a.example.com".to_string(),
            protocol: Protocol::Https,
            url: "https://a.example.com".to_string(),
            status_code: None,
            tls_version: None,
            content_length: None,
            title: None,
            server: None,
            cdn: None,
        };
        let json = serde_json::to_value(&host).unwrap();
        assert!(json["status_code"].is_null());
        assert_eq!(json["protocol"], "https");
    }
}
