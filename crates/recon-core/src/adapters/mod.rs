//! Source adapters: per-tool translation of raw output into records.
//!
//! Each external tool has its own output shape (JSON lines with tool-specific
//! field names, prefixed text lines, a single JSON or XML document). An
//! adapter knows exactly one of those shapes and turns it into normalized
//! [`Record`]s and, for tools that report them, [`Secret`]s or [`Finding`]s.
//! Malformed lines are skipped.
//!
//! Tools whose output is not a stream of records (httpx, naabu, nmap, nikto,
//! arjun, x8, wpscan, wafw00f) have dedicated parsers instead.
//!
//! Adding a tool means adding an adapter here; the aggregator never changes.
//!
//! ```rust
//! use recon_core::adapters::{SourceAdapter, adapter_for};
//! use recon_core::Tool;
//!
//! let gau = adapter_for(Tool::Gau).unwrap();
//! let lines = vec![
//!     r#"{"url":"https://example.com/app.js"}"#.to_string(),
//!     "not json".to_string(),
//! ];
//! let adapted = gau.adapt(&lines, "example.com");
//! assert_eq!(adapted.records.len(), 1);
//! ```

pub mod cms;
pub mod hosts;
pub mod js;
pub mod nmap;
pub mod params;
pub mod httpx;
pub mod secrets;
pub mod urls;
pub mod vulns;
pub mod waf;

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::{Record, Secret, Tool};

pub use cms::{CmsInfo, parse_wpscan};
pub use hosts::{parse_hosts, parse_ports};
pub use js::{JsReconAdapter, LinkFinderAdapter, SecretFinderAdapter};
pub use nmap::{NmapScan, OsMatch, ServiceInfo, parse_nmap_xml};
pub use params::{Parameters, parse_arjun, parse_x8};
pub use httpx::{HttpResult, parse_http_results, parse_port_info};
pub use secrets::TrufflehogAdapter;
pub use urls::{FfufAdapter, GauAdapter, GospiderAdapter, HakrawlerAdapter, WaybackAdapter};
pub use vulns::{Finding, NucleiAdapter, parse_nikto};
pub use waf::{WafDetection, parse_wafw00f};

/// Output of one adapter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adapted {
    /// Normalized, domain-scoped records in tool output order.
    pub records: Vec<Record>,
    /// Secrets in tool output order.
    pub secrets: Vec<Secret>,
    /// Scanner findings in tool output order.
    pub findings: Vec<Finding>,
}

impl Adapted {
    /// Records only.
    #[must_use]
    pub const fn records(records: Vec<Record>) -> Self {
        Self {
            records,
            secrets: Vec::new(),
            findings: Vec::new(),
        }
    }

    /// Whether the adapter produced nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.secrets.is_empty() && self.findings.is_empty()
    }
}

/// Translation of one tool's raw output into records and secrets.
pub trait SourceAdapter: Send + Sync {
    /// The tool whose output this adapter understands.
    fn tool(&self) -> Tool;

    /// Translate raw output lines for the target `domain`.
    ///
    /// Never fails: lines that cannot be parsed are dropped.
    fn adapt(&self, lines: &[String], domain: &str) -> Adapted;
}

/// Look up the line adapter for a tool.
///
/// Returns `None` for tools with dedicated parsers (subfinder, httpx,
/// naabu, whois, nmap, nikto, arjun, x8, wpscan, wafw00f).
#[must_use]
pub fn adapter_for(tool: Tool) -> Option<Box<dyn SourceAdapter>> {
    let adapter: Box<dyn SourceAdapter> = match tool {
        Tool::Gau => Box::new(GauAdapter),
        Tool::Gospider => Box::new(GospiderAdapter),
        Tool::Hakrawler => Box::new(HakrawlerAdapter),
        Tool::Waybackurls => Box::new(WaybackAdapter),
        Tool::JsRecon => Box::new(JsReconAdapter),
        Tool::LinkFinder => Box::new(LinkFinderAdapter),
        Tool::SecretFinder => Box::new(SecretFinderAdapter),
        Tool::Ffuf => Box::new(FfufAdapter),
        Tool::Trufflehog => Box::new(TrufflehogAdapter),
        Tool::Nuclei => Box::new(NucleiAdapter),
        Tool::Subfinder
        | Tool::Httpx
        | Tool::Naabu
        | Tool::Whois
        | Tool::Nmap
        | Tool::Nikto
        | Tool::Arjun
        | Tool::X8
        | Tool::Wpscan
        | Tool::Wafw00f => return None,
    };
    Some(adapter)
}

/// Parse JSON lines into `T`, skipping blanks and anything that fails to parse.
pub(crate) fn json_lines<'a, T>(tool: Tool, lines: &'a [String]) -> impl Iterator<Item = T> + 'a
where
    T: DeserializeOwned + 'a,
{
    lines.iter().filter_map(move |line| {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<T>(line) {
            Ok(value) => Some(value),
            Err(e) => {
                trace!(tool = %tool, error = %e, "skipping malformed line");
                None
            },
        }
    })
}

/// Trimmed, non-empty lines.
pub(crate) fn text_lines(lines: &[String]) -> impl Iterator<Item = &str> {
    lines.iter().map(|line| line.trim()).filter(|line| !line.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_url_tool_has_an_adapter() {
        for tool in Tool::DISCOVERY_ORDER {
            let adapter = adapter_for(tool).unwrap();
            assert_eq!(adapter.tool(), tool);
        }
    }

    #[test]
    fn test_scanner_adapters() {
        for tool in [Tool::Trufflehog, Tool::Nuclei] {
            assert_eq!(adapter_for(tool).unwrap().tool(), tool);
        }
    }

    #[test]
    fn test_tools_with_dedicated_parsers_have_no_adapter() {
        for tool in [
            Tool::Subfinder,
            Tool::Httpx,
            Tool::Naabu,
            Tool::Whois,
            Tool::Nmap,
            Tool::Nikto,
            Tool::Arjun,
            Tool::X8,
            Tool::Wpscan,
            Tool::Wafw00f,
        ] {
            assert!(adapter_for(tool).is_none());
        }
    }

    #[test]
    fn test_json_lines_skips_garbage() {
        #[derive(serde::Deserialize)]
        struct Line {
            n: u32,
        }

        let lines = vec![
            r#"{"n":1}"#.to_string(),
            String::new(),
            "{broken".to_string(),
            r#"{"n":2}"#.to_string(),
        ];
        let parsed: Vec<u32> = json_lines::<Line>(Tool::Gau, &lines).map(|l| l.n).collect();
        assert_eq!(parsed, vec![1, 2]);
    }
}
