//! Vulnerability scanning of one web application with nuclei and nikto.

use tracing::{info, instrument};

use super::collect;
use crate::adapters::{NucleiAdapter, SourceAdapter, parse_nikto};
use crate::tools::{Invocation, Tool, ToolExecutor};
use crate::{Report, Result};

/// Run nuclei and nikto against `url` concurrently.
///
/// The report carries `target` and `findings`: nuclei's first, then
/// nikto's, each in tool output order.
///
/// # Errors
///
/// Returns an error only if the scratch directory for nikto's report cannot
/// be created. Tool failures are logged and skipped.
#[instrument(skip_all, fields(url = %url))]
pub async fn scan_vulnerabilities<E: ToolExecutor>(executor: &E, url: &str) -> Result<Report> {
    let scratch = tempfile::tempdir()?;
    let nikto_file = scratch.path().join("nikto.json");

    let nuclei = Invocation::new(Tool::Nuclei).args(["-u", url, "-jsonl", "-silent"]);
    let nikto = Invocation::new(Tool::Nikto)
        .args(["-h", url, "-Format", "json", "-nointeractive", "-output"])
        .arg(nikto_file.display().to_string())
        .capture_file(&nikto_file);

    let (nuclei, nikto) = tokio::join!(collect(executor, nuclei), collect(executor, nikto));

    let mut findings = NucleiAdapter.adapt(&nuclei.lines(), url).findings;
    let from_nuclei = findings.len();
    findings.extend(parse_nikto(&nikto.stdout));
    info!(nuclei = from_nuclei, nikto = findings.len() - from_nuclei, "scan finished");

    Ok(Report {
        target: Some(url.to_string()),
        findings: Some(findings),
        ..Report::default()
    })
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

    #[tokio::test]
    async fn test_nuclei_then_nikto() {
        let executor = FakeExecutor::new(Config::default())
            .with(
                Tool::Nuclei,
                r#"{"template-id":"exposed-panel","info":{"name":"Admin Panel","severity":"high"},"matched-at":"https://example.com/admin"}"#,
            )
            .with(
                Tool::Nikto,
                r#"{"host":"example.com","vulnerabilities":[{"id":"999986","url":"/","msg":"Missing header"}]}"#,
            );

        let report = scan_vulnerabilities(&executor, "https://example.com").await.unwrap();
        let findings = report.findings.unwrap();
        let ids: Vec<_> = findings.iter().map(|f| (f.tool.as_str(), f.id.as_str())).collect();
        assert_eq!(ids, vec![("nuclei", "exposed-panel"), ("nikto", "999986")]);
        assert_eq!(report.target.as_deref(), Some("https://example.com"));

        let nikto = executor.invocation(Tool::Nikto).unwrap();
        let output = nikto.capture_file.unwrap();
        assert_eq!(nikto.args.last().unwrap(), &output.display().to_string());
    }

    #[tokio::test]
    async fn test_failing_scanner_contributes_nothing() {
        let executor = FakeExecutor::new(Config::default())
            .failing(Tool::Nuclei)
            .with(Tool::Nikto, "+ ERROR: Host maximum execution time reached");

        let report = scan_vulnerabilities(&executor, "https://example.com").await.unwrap();
        assert_eq!(report.findings, Some(Vec::new()));
    }
}
