//! WordPress fingerprinting with wpscan.

use tracing::{info, instrument};

use super::collect;
use crate::adapters::{CmsInfo, parse_wpscan};
use crate::tools::{Invocation, Tool, ToolExecutor};
use crate::Report;

/// Everything wpscan can enumerate: plugins, themes, users, timthumbs,
/// media, config backups and database exports.
const ENUMERATE: &str = "p,t,u,tt,m,cb,dbe";

/// Fingerprint `url` with wpscan.
///
/// A scan refused with a 403 is retried once with a random user agent.
/// The report carries `target` and `cms`. An API token goes in
/// `[tools.wpscan] args`.
#[instrument(skip_all, fields(url = %url))]
pub async fn scan_cms<E: ToolExecutor>(executor: &E, url: &str) -> Report {
    let mut cms = run_wpscan(executor, url, false).await;
    if cms.blocked() {
        info!("wpscan was refused, retrying with a random user agent");
        cms = run_wpscan(executor, url, true).await;
    }
    info!(wordpress = ?cms.is_wordpress, version = ?cms.version, "cms scan finished");

    Report {
        target: Some(url.to_string()),
        cms: Some(cms),
        ..Report::default()
    }
}

async fn run_wpscan<E: ToolExecutor>(executor: &E, url: &str, random_agent: bool) -> CmsInfo {
    let mut invocation = Invocation::new(Tool::Wpscan).args([
        "--url",
        url,
        "--no-banner",
        "--format",
        "json",
        "--enumerate",
        ENUMERATE,
        "--clear-cache",
        "--throttle",
        "1",
    ]);
    if random_agent {
        invocation = invocation.arg("--random-user-agent");
    }
    parse_wpscan(&collect(executor, invocation).await.stdout)
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
    async fn test_wordpress_site() {
        let executor = FakeExecutor::new(Config::default())
            .with(Tool::Wpscan, r#"{"version":{"number":"6.2"},"users":{"admin":{}}}"#);

        let report = scan_cms(&executor, "https://blog.example.com").await;
        let cms = report.cms.unwrap();
        assert_eq!(cms.is_wordpress, Some(true));
        assert_eq!(cms.version.as_deref(), Some("6.2"));
        assert_eq!(executor.invocations(Tool::Wpscan).len(), 1);
    }

    #[tokio::test]
    async fn test_forbidden_scan_is_retried_once() {
        let executor = FakeExecutor::new(Config::default()).with(
            Tool::Wpscan,
            r#"{"scan_aborted":"The target is responding with a 403, this might be due to a WAF"}"#,
        );

        let report = scan_cms(&executor, "https://blog.example.com").await;
        let calls = executor.invocations(Tool::Wpscan);
        assert_eq!(calls.len(), 2);
        assert!(!calls[0].args.iter().any(|a| a == "--random-user-agent"));
        assert_eq!(calls[1].args.last().unwrap(), "--random-user-agent");
        assert_eq!(report.cms.unwrap().is_wordpress, None);
    }

    #[tokio::test]
    async fn test_missing_wpscan() {
        let executor = FakeExecutor::new(Config::default());
        let report = scan_cms(&executor, "https://example.com").await;
        assert_eq!(report.cms, Some(CmsInfo::default()));
    }
}
