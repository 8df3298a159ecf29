//! External tool integration.
//!
//! Every data source is a third-party binary (or script) run as a black
//! box. This module knows their names, how to find them, and how to run
//! them with a timeout; it knows nothing about their output formats (see
//! [`crate::adapters`]).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use recon_core::tools::{Invocation, ToolExecutor, ToolRunner, ToolStatus, detect_tools};
//! use recon_core::{Config, Tool};
//!
//! # async fn example() -> recon_core::Result<()> {
//! let config = Config::default();
//! for (tool, status) in detect_tools(&config).await {
//!     if let ToolStatus::NotInstalled = status {
//!         println!("{tool} is missing");
//!     }
//! }
//!
//! let runner = ToolRunner::new(config);
//! let output = runner
//!     .execute(Invocation::new(Tool::Subfinder).args(["-d", "example.com", "-silent"]))
//!     .await?;
//! println!("{} hosts", output.lines().len());
//! # Ok(())
//! # }
//! ```

pub mod detect;
pub mod run;

use std::fmt;
use std::str::FromStr;

use crate::Error;

pub use detect::{ToolStatus, detect_tools, find_in_path, locate};
pub use run::{Invocation, ToolExecutor, ToolOutput, ToolRunner};

/// The external tools reconkit drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    /// getallurls: known URLs from public archives and crawl indexes
    Gau,
    /// Web spider
    Gospider,
    /// Web crawler
    Hakrawler,
    /// Wayback Machine URL dump
    Waybackurls,
    /// JavaScript endpoint and sensitive string extractor
    JsRecon,
    /// Endpoint extractor for JavaScript files
    LinkFinder,
    /// Secret and API key extractor for JavaScript files
    SecretFinder,
    /// Directory brute-forcer
    Ffuf,
    /// Passive subdomain enumerator
    Subfinder,
    /// HTTP toolkit
    Httpx,
    /// WHOIS client
    Whois,
    /// Port scanner
    Naabu,
    /// Service and OS fingerprinting of open ports
    Nmap,
    /// Secret scanner for git repositories
    Trufflehog,
    /// Template-based vulnerability scanner
    Nuclei,
    /// Web server scanner
    Nikto,
    /// HTTP parameter discovery
    Arjun,
    /// Hidden parameter discovery
    X8,
    /// WordPress scanner
    Wpscan,
    /// Web application firewall fingerprinting
    Wafw00f,
}

impl Tool {
    /// Every tool.
    pub const ALL: [Self; 20] = [
        Self::Gau,
        Self::Gospider,
        Self::Hakrawler,
        Self::Waybackurls,
        Self::JsRecon,
        Self::LinkFinder,
        Self::SecretFinder,
        Self::Ffuf,
        Self::Subfinder,
        Self::Httpx,
        Self::Whois,
        Self::Naabu,
        Self::Nmap,
        Self::Trufflehog,
        Self::Nuclei,
        Self::Nikto,
        Self::Arjun,
        Self::X8,
        Self::Wpscan,
        Self::Wafw00f,
    ];

    /// URL discovery sources in merge precedence order.
    pub const DISCOVERY_ORDER: [Self; 8] = [
        Self::Gau,
        Self::Gospider,
        Self::Hakrawler,
        Self::Waybackurls,
        Self::JsRecon,
        Self::LinkFinder,
        Self::SecretFinder,
        Self::Ffuf,
    ];

    /// Lower-case name used in config keys and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gau => "gau",
            Self::Gospider => "gospider",
            Self::Hakrawler => "hakrawler",
            Self::Waybackurls => "waybackurls",
            Self::JsRecon => "jsrecon",
            Self::LinkFinder => "linkfinder",
            Self::SecretFinder => "secretfinder",
            Self::Ffuf => "ffuf",
            Self::Subfinder => "subfinder",
            Self::Httpx => "httpx",
            Self::Whois => "whois",
            Self::Naabu => "naabu",
            Self::Nmap => "nmap",
            Self::Trufflehog => "trufflehog",
            Self::Nuclei => "nuclei",
            Self::Nikto => "nikto",
            Self::Arjun => "arjun",
            Self::X8 => "x8",
            Self::Wpscan => "wpscan",
            Self::Wafw00f => "wafw00f",
        }
    }

    /// Executable name searched for in `PATH` when no path is configured.
    #[must_use]
    pub const fn default_binary(self) -> &'static str {
        match self {
            Self::JsRecon => "JSRecon",
            Self::SecretFinder => "SecretFinder",
            other => other.name(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == wanted)
            .ok_or_else(|| Error::NotFound(format!("unknown tool '{s}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for tool in Tool::ALL {
            assert_eq!(tool.name().parse::<Tool>().unwrap(), tool);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("JSRecon".parse::<Tool>().unwrap(), Tool::JsRecon);
        assert_eq!(" Gau ".parse::<Tool>().unwrap(), Tool::Gau);
        assert_eq!("WAFW00F".parse::<Tool>().unwrap(), Tool::Wafw00f);
    }

    #[test]
    fn test_unknown_tool() {
        let err = "masscan".parse::<Tool>().unwrap_err();
        assert_eq!(err.category(), "not_found");
    }

    #[test]
    fn test_discovery_order_is_subset_of_all() {
        for tool in Tool::DISCOVERY_ORDER {
            assert!(Tool::ALL.contains(&tool));
        }
        assert_eq!(Tool::DISCOVERY_ORDER[0], Tool::Gau);
        assert_eq!(Tool::DISCOVERY_ORDER[7], Tool::Ffuf);
    }

    #[test]
    fn test_default_binaries() {
        assert_eq!(Tool::JsRecon.default_binary(), "JSRecon");
        assert_eq!(Tool::Httpx.default_binary(), "httpx");
    }
}
