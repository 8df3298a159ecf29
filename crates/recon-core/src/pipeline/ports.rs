//! Port scan followed by HTTP fingerprinting and a deep service scan of the
//! open ports.

use tracing::{info, instrument, warn};

use super::collect;
use crate::adapters::{NmapScan, parse_nmap_xml, parse_port_info, parse_ports};
use crate::tools::{Invocation, Tool, ToolExecutor};
use crate::Report;

/// NSE scripts run against every open port.
const NMAP_SCRIPTS: &str = "ssl-cert,http-headers,http-title";

/// Knobs for a port scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortScanOptions {
    /// Scan all 65535 ports instead of the top 100.
    pub full: bool,
}

/// Scan `target` with naabu, then ask httpx and nmap about every open port.
///
/// The report carries `target`, `open_ports`, `http_tech`, `services` and,
/// when OS detection matched, `os`. httpx and nmap only run when at least
/// one port is open, and run concurrently.
#[instrument(skip_all, fields(target = %target, full = options.full))]
pub async fn scan_ports<E: ToolExecutor>(
    executor: &E,
    target: &str,
    options: PortScanOptions,
) -> Report {
    let range: [&str; 2] = if options.full { ["-p", "-"] } else { ["-tp", "100"] };
    let naabu = collect(
        executor,
        Invocation::new(Tool::Naabu)
            .args(["-host", target, "-silent", "-json"])
            .args(range),
    )
    .await;

    let open_ports = parse_ports(&naabu.lines());
    info!(count = open_ports.len(), "open ports");

    let (http_tech, deep) = if open_ports.is_empty() {
        (Default::default(), NmapScan::default())
    } else {
        let port_list = open_ports
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let httpx = Invocation::new(Tool::Httpx).args([
            "-u",
            target,
            "-p",
            port_list.as_str(),
            "-title",
            "-status-code",
            "-server",
            "-tech-detect",
            "-follow-redirects",
            "-json",
            "-no-fallback",
        ]);
        let nmap = Invocation::new(Tool::Nmap).args([
            "-Pn",
            "-sV",
            "--version-intensity",
            "2",
            "-O",
            "--osscan-guess",
            "--script",
            NMAP_SCRIPTS,
            "-p",
            port_list.as_str(),
            "-oX",
            "-",
            target,
        ]);

        let (httpx, nmap) = tokio::join!(collect(executor, httpx), collect(executor, nmap));
        let deep = parse_nmap_xml(&nmap.stdout).unwrap_or_else(|e| {
            warn!(tool = %Tool::Nmap, error = %e, "discarding unreadable scan");
            NmapScan::default()
        });
        info!(services = deep.services.len(), os = deep.os.is_some(), "deep scan");
        (parse_port_info(&httpx.lines()), deep)
    };

    Report {
        target: Some(target.to_string()),
        open_ports: Some(open_ports),
        http_tech: Some(http_tech),
        services: Some(deep.services),
        os: deep.os,
        ..Report::default()
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
    use crate::Config;
    use crate::pipeline::testing::FakeExecutor;

    const NMAP_XML: &str = r#"<?xml version="1.0"?>
<nmaprun>
  <host>
    <ports>
      <port protocol="tcp" portid="80">
        <state state="open"/>
        <service name="http" product="Apache httpd" version="2.4.57" extrainfo="(Debian)"/>
      </port>
      <port protocol="tcp" portid="443">
        <state state="open"/>
        <service name="https" product="nginx"/>
      </port>
    </ports>
    <os><osmatch name="Linux 4.15 - 5.8" accuracy="96"/></os>
  </host>
</nmaprun>"#;

    #[tokio::test]
    async fn test_scan_then_fingerprint() {
        let executor = FakeExecutor::new(Config::default())
            .with(
                Tool::Naabu,
                "{\"host\":\"example.com\",\"port\":443}\n{\"host\":\"example.com\",\"port\":\"80\"}\n",
            )
            .with(
                Tool::Httpx,
                r#"{"port":"443","status_code":200,"title":"Home","webserver":"nginx","tech":["Nginx"]}"#,
            );

        let report = scan_ports(&executor, "example.com", PortScanOptions::default()).await;

        assert_eq!(report.target.as_deref(), Some("example.com"));
        assert_eq!(report.open_ports, Some(vec![80, 443]));
        let http = report.http_tech.unwrap();
        assert_eq!(http.len(), 1);
        assert_eq!(http[&443].title.as_deref(), Some("Home"));

        let naabu = executor.invocation(Tool::Naabu).unwrap();
        assert_eq!(naabu.args[4..], ["-tp", "100"]);
        let httpx = executor.invocation(Tool::Httpx).unwrap();
        assert_eq!(httpx.args[..4], ["-u", "example.com", "-p", "80,443"]);
    }

    #[tokio::test]
    async fn test_deep_scan_fills_services_and_os() {
        let executor = FakeExecutor::new(Config::default())
            .with(Tool::Naabu, "{\"port\":80}\n{\"port\":443}")
            .with(Tool::Nmap, NMAP_XML);

        let report = scan_ports(&executor, "10.0.0.1", PortScanOptions::default()).await;

        let services = report.services.unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].port, 80);
        assert_eq!(services[0].product.as_deref(), Some("Apache httpd"));
        assert_eq!(services[0].extrainfo.as_deref(), Some("(Debian)"));
        assert_eq!(services[1].service.as_deref(), Some("https"));

        let os = report.os.unwrap();
        assert_eq!(os.name, "Linux 4.15 - 5.8");
        assert_eq!(os.accuracy, Some(96));

        let nmap = executor.invocation(Tool::Nmap).unwrap();
        assert!(nmap.args.iter().any(|a| a == "-sV"));
        assert!(nmap.args.iter().any(|a| a == "-O"));
        assert!(nmap.args.iter().any(|a| a == NMAP_SCRIPTS));
        assert_eq!(nmap.args[nmap.args.len() - 5..], ["-p", "80,443", "-oX", "-", "10.0.0.1"]);
    }

    #[tokio::test]
    async fn test_unreadable_deep_scan_keeps_the_rest() {
        let executor = FakeExecutor::new(Config::default())
            .with(Tool::Naabu, "{\"port\":22}")
            .with(Tool::Nmap, "<nmaprun><host></ports>");

        let report = scan_ports(&executor, "10.0.0.1", PortScanOptions::default()).await;
        assert_eq!(report.open_ports, Some(vec![22]));
        assert_eq!(report.services, Some(Vec::new()));
        assert!(report.os.is_none());
    }

    #[tokio::test]
    async fn test_full_range() {
        let executor = FakeExecutor::new(Config::default());
        let report = scan_ports(&executor, "10.0.0.1", PortScanOptions { full: true }).await;

        let naabu = executor.invocation(Tool::Naabu).unwrap();
        assert_eq!(naabu.args[4..], ["-p", "-"]);
        assert_eq!(report.open_ports, Some(Vec::new()));
        assert!(report.http_tech.unwrap().is_empty());
        assert_eq!(report.services, Some(Vec::new()));
        assert!(executor.invocation(Tool::Httpx).is_none());
        assert!(executor.invocation(Tool::Nmap).is_none());
    }
}
