//! Subdomain enumeration, HTTP checks and liveness bucketing.

use tracing::{info, instrument, warn};

use super::collect;
use crate::adapters::{parse_hosts, parse_http_results};
use crate::liveness::{enrich, partition};
use crate::tools::{Invocation, Tool, ToolExecutor};
use crate::whois::{WhoisRecord, parse_whois, whois_error};
use crate::{Config, Report};

/// WHOIS the domain, enumerate its subdomains, request each over http and
/// https, and bucket the results.
///
/// The report always carries `whois`, `alive`, `dead` and `check`. When
/// subfinder finds nothing, httpx is not run and all buckets are empty.
#[instrument(skip_all, fields(domain = %domain))]
pub async fn enumerate_subdomains<E: ToolExecutor>(executor: &E, domain: &str) -> Report {
    let (whois, subfinder) = tokio::join!(
        lookup_whois(executor, domain),
        collect(
            executor,
            Invocation::new(Tool::Subfinder).args(["-d", domain, "-silent"])
        ),
    );

    let subdomains = parse_hosts(&subfinder.lines());
    info!(count = subdomains.len(), "subdomains found");

    let hosts = if subdomains.is_empty() {
        Vec::new()
    } else {
        let candidates: Vec<String> = subdomains
            .iter()
            .flat_map(|sub| [format!("http://{sub}"), format!("https://{sub}")])
            .collect();
        let httpx = collect(executor, httpx_invocation(executor.config(), &candidates)).await;
        enrich(parse_http_results(&httpx.lines(), &httpx.stderr_lines()))
    };

    let buckets = partition(hosts);
    info!(
        alive = buckets.alive.len(),
        dead = buckets.dead.len(),
        check = buckets.check.len(),
        "http checks finished"
    );

    Report {
        whois: Some(whois),
        alive: Some(buckets.alive),
        dead: Some(buckets.dead),
        check: Some(buckets.check),
        ..Report::default()
    }
}

async fn lookup_whois<E: ToolExecutor>(executor: &E, domain: &str) -> WhoisRecord {
    match executor
        .execute(Invocation::new(Tool::Whois).arg(domain))
        .await
    {
        Ok(output) => parse_whois(&output.stdout),
        Err(e) => {
            warn!(category = e.category(), "whois lookup failed: {e}");
            whois_error(format!("WHOIS lookup failed: {e}"))
        },
    }
}

fn httpx_invocation(config: &Config, candidates: &[String]) -> Invocation {
    Invocation::new(Tool::Httpx)
        .args([
            "-json",
            "-status-code",
            "-tls-grab",
            "-title",
            "-content-length",
            "-web-server",
            "-cdn",
            "-follow-redirects",
        ])
        .arg("-timeout")
        .arg(config.httpx.timeout.to_string())
        .arg("-retries")
        .arg(config.httpx.retries.to_string())
        .args(["-no-color", "-v"])
        .stdin(candidates.join("\n"))
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
    use crate::Protocol;
    use crate::pipeline::testing::FakeExecutor;
    use crate::tools::ToolOutput;
    use crate::whois::WhoisValue;

    #[tokio::test]
    async fn test_full_run() {
        let httpx = ToolOutput {
            stdout: [
                r#"{"url":"https://api.example.com","status_code":200,"tls":{"tls_version":"tls13"},"webserver":"nginx"}"#,
                r#"{"url":"http://api.example.com","status_code":301}"#,
                r#"{"url":"https://www.example.com","status_code":404}"#,
            ]
            .join("\n"),
            stderr: "[DBG] Failed 'http://www.example.com': Get 'http://www.example.com': refused\n"
                .into(),
            status: Some(0),
        };
        let executor = FakeExecutor::new(Config::default())
            .with(Tool::Whois, "Registrar: Example Registrar\nName Server: A\nName Server: B\n")
            .with(Tool::Subfinder, "api.example.com\nwww.example.com\napi.example.com\n")
            .with_output(Tool::Httpx, httpx);

        let report = enumerate_subdomains(&executor, "example.com").await;

        let whois = report.whois.unwrap();
        assert_eq!(whois["Registrar"], WhoisValue::One("Example Registrar".into()));

        let alive = report.alive.unwrap();
        let dead = report.dead.unwrap();
        let check = report.check.unwrap();
        assert_eq!(alive.len(), 1);
        assert_eq!(alive[0].id, 1);
        assert_eq!(alive[0].protocol, Protocol::Https);
        assert_eq!(alive[0].server.as_deref(), Some("nginx"));
        assert_eq!(check[0].url, "http://api.example.com");
        assert_eq!(dead.len(), 2);
        assert_eq!(dead[1].url, "http://www.example.com");
        assert_eq!(dead[1].id, 4);

        let httpx = executor.invocation(Tool::Httpx).unwrap();
        assert_eq!(
            httpx.stdin.as_deref(),
            Some(
                "http://api.example.com\nhttps://api.example.com\nhttp://www.example.com\nhttps://www.example.com"
            )
        );
        assert!(httpx.args.windows(2).any(|w| w == ["-timeout", "30"]));
        assert!(httpx.args.windows(2).any(|w| w == ["-retries", "2"]));
    }

    #[tokio::test]
    async fn test_no_subdomains_skips_httpx() {
        let executor = FakeExecutor::new(Config::default()).with(Tool::Whois, "");
        let report = enumerate_subdomains(&executor, "example.com").await;

        assert!(executor.invocation(Tool::Httpx).is_none());
        assert_eq!(report.alive, Some(Vec::new()));
        assert_eq!(report.dead, Some(Vec::new()));
        assert_eq!(report.check, Some(Vec::new()));
        assert!(report.whois.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whois_failure_is_recorded() {
        let executor = FakeExecutor::new(Config::default()).failing(Tool::Whois);
        let report = enumerate_subdomains(&executor, "example.com").await;

        let whois = report.whois.unwrap();
        match &whois["error"] {
            WhoisValue::One(message) => assert!(message.starts_with("WHOIS lookup failed")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
