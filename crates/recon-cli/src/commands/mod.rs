//! Command implementations for the recon CLI.
//!
//! Each command lives in its own submodule; the helpers here cover what
//! they share: argument-to-domain resolution, default report paths and
//! printing the outcome of a run.

mod cms;
mod config;
mod discover;
mod merge;
mod params;
mod ports;
mod secrets;
mod subdomains;
mod tools;
mod vulns;
mod waf;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use recon_core::discovery::extract_domain;
use recon_core::report::report_file_name;
use recon_core::{Config, Report, ReportWriter};

use crate::args::OutputFormat;

pub use cms::execute as scan_cms;
pub use config::{print_path as show_config_path, show as show_config};
pub use discover::execute as discover;
pub use merge::execute as merge;
pub use params::execute as discover_parameters;
pub use ports::execute as scan_ports;
pub use secrets::execute as scan_repository;
pub use subdomains::execute as enumerate_subdomains;
pub use tools::execute as list_tools;
pub use vulns::execute as scan_vulnerabilities;
pub use waf::execute as detect_waf;

/// Load the effective configuration.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Config> {
    Ok(Config::load(explicit)?)
}

/// Reduce a domain or URL argument to its host name.
pub(crate) fn resolve_domain(input: &str) -> Result<String> {
    extract_domain(input).ok_or_else(|| {
        recon_core::Error::InvalidUrl(format!("invalid domain or URL: '{input}'")).into()
    })
}

/// Resolve a URL argument to `(domain, url)`.
///
/// Absolute `http(s)` URLs are kept as given; anything else is scanned over
/// https.
pub(crate) fn resolve_url(input: &str) -> Result<(String, String)> {
    let domain = resolve_domain(input)?;
    let input = input.trim();
    let url = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };
    Ok((domain, url))
}

/// Explicit `--output`, else a timestamped file under `[paths] output_dir`.
pub(crate) fn report_path(
    config: &Config,
    explicit: Option<PathBuf>,
    domain: &str,
    kind: &str,
) -> PathBuf {
    explicit.unwrap_or_else(|| {
        config
            .paths
            .output_dir
            .join(report_file_name(domain, kind, Local::now()))
    })
}

/// Persist `report` and tell the user where it went.
pub(crate) fn write_report(report: &Report, path: &Path, format: OutputFormat) -> Result<()> {
    ReportWriter::write(report, path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            let payload = serde_json::json!({ "path": path, "report": report });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        },
        OutputFormat::Text => {
            println!("{} {}", "Report written to".green(), path.display());
            for (section, count) in section_counts(report) {
                println!("  {section}: {}", count.to_string().bold());
            }
        },
    }
    Ok(())
}

/// Entry count of every section present in `report`, in JSON key order.
pub(crate) fn section_counts(report: &Report) -> Vec<(&'static str, usize)> {
    let mut counts = Vec::new();
    let mut push = |name: &'static str, len: Option<usize>| {
        if let Some(len) = len {
            counts.push((name, len));
        }
    };

    push("URLS", report.urls.as_ref().map(Vec::len));
    push("secrets", report.secrets.as_ref().map(Vec::len));
    push("waybackurls", report.waybackurls.as_ref().map(Vec::len));
    push("whois", report.whois.as_ref().map(BTreeMap::len));
    push("alive", report.alive.as_ref().map(Vec::len));
    push("dead", report.dead.as_ref().map(Vec::len));
    push("check", report.check.as_ref().map(Vec::len));
    push("open_ports", report.open_ports.as_ref().map(Vec::len));
    push("http_tech", report.http_tech.as_ref().map(BTreeMap::len));
    push("services", report.services.as_ref().map(Vec::len));
    push("os", report.os.as_ref().map(|_| 1));
    push("findings", report.findings.as_ref().map(Vec::len));
    push(
        "parameters",
        report.parameters.as_ref().map(|p| p.x8.len() + p.arjun_detected.len()),
    );
    push("cms", report.cms.as_ref().map(|_| 1));
    push("waf", report.waf.as_ref().map(|w| w.firewalls.len()));
    counts
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
    use crate::error::exit_code_from_error;
    use recon_core::Record;
    use recon_core::adapters::WafDetection;

    #[test]
    fn test_resolve_domain() {
        assert_eq!(resolve_domain("https://Example.com/login").unwrap(), "example.com");
        assert_eq!(resolve_domain("sub.example.com").unwrap(), "sub.example.com");

        let err = resolve_domain("  ").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<recon_core::Error>(),
            Some(recon_core::Error::InvalidUrl(_))
        ));
        assert!(err.to_string().contains("invalid domain or URL: '  '"));
        assert_eq!(exit_code_from_error(&err), 2);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("example.com/search").unwrap(),
            ("example.com".to_string(), "https://example.com/search".to_string())
        );
        assert_eq!(
            resolve_url(" http://Example.com:8080/app ").unwrap(),
            ("example.com".to_string(), "http://Example.com:8080/app".to_string())
        );
        assert!(resolve_url("").is_err());
    }

    #[test]
    fn test_report_path_prefers_explicit() {
        let config = Config::default();
        let explicit = PathBuf::from("/tmp/out.json");
        assert_eq!(
            report_path(&config, Some(explicit.clone()), "example.com", "discovery"),
            explicit
        );

        let generated = report_path(&config, None, "example.com", "discovery");
        assert!(generated.starts_with("outputs"));
        let name = generated.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("example_com_discovery_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_section_counts_skip_absent_sections() {
        let report = Report {
            urls: Some(vec![Record::new("https://example.com/a")]),
            secrets: Some(Vec::new()),
            ..Report::default()
        };
        assert_eq!(section_counts(&report), vec![("URLS", 1), ("secrets", 0)]);
    }

    #[test]
    fn test_section_counts_for_scanner_reports() {
        let report = Report {
            open_ports: Some(vec![22, 80]),
            services: Some(Vec::new()),
            waf: Some(WafDetection {
                url: "https://example.com".into(),
                detected: Some(true),
                firewalls: vec!["Cloudflare".into()],
            }),
            ..Report::default()
        };
        assert_eq!(
            section_counts(&report),
            vec![("open_ports", 2), ("services", 0), ("waf", 1)]
        );
    }
}
