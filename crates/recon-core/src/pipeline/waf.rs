//! Web application firewall detection with wafw00f.

use tracing::{info, instrument};

use super::collect;
use crate::adapters::parse_wafw00f;
use crate::tools::{Invocation, Tool, ToolExecutor};
use crate::{Report, Result};

/// Ask wafw00f which firewall, if any, sits in front of `url`.
///
/// The report carries `target` and `waf`.
///
/// # Errors
///
/// Returns an error only if the scratch directory for wafw00f's report
/// cannot be created. Tool failures are logged and leave `waf.detected`
/// unset.
#[instrument(skip_all, fields(url = %url))]
pub async fn detect_waf<E: ToolExecutor>(executor: &E, url: &str) -> Result<Report> {
    let scratch = tempfile::tempdir()?;
    let out_file = scratch.path().join("wafw00f.json");

    let output = collect(
        executor,
        Invocation::new(Tool::Wafw00f)
            .args([url, "-f", "json", "-o"])
            .arg(out_file.display().to_string())
            .capture_file(&out_file),
    )
    .await;

    let waf = parse_wafw00f(&output.stdout, url);
    info!(detected = ?waf.detected, firewalls = ?waf.firewalls, "waf detection finished");

    Ok(Report {
        target: Some(url.to_string()),
        waf: Some(waf),
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
    async fn test_detected_firewall() {
        let executor = FakeExecutor::new(Config::default()).with(
            Tool::Wafw00f,
            r#"[{"url":"https://example.com","detected":true,"firewall":"Cloudflare","manufacturer":"Cloudflare Inc."}]"#,
        );

        let report = detect_waf(&executor, "https://example.com").await.unwrap();
        let waf = report.waf.unwrap();
        assert_eq!(waf.detected, Some(true));
        assert_eq!(waf.firewalls, vec!["Cloudflare (Cloudflare Inc.)"]);

        let inv = executor.invocation(Tool::Wafw00f).unwrap();
        assert_eq!(inv.args[..4], ["https://example.com", "-f", "json", "-o"]);
        assert!(inv.capture_file.is_some());
    }

    #[tokio::test]
    async fn test_missing_tool_leaves_detection_unset() {
        let executor = FakeExecutor::new(Config::default());
        let report = detect_waf(&executor, "https://example.com").await.unwrap();
        let waf = report.waf.unwrap();
        assert_eq!(waf.detected, None);
        assert_eq!(waf.url, "https://example.com");
    }
}
