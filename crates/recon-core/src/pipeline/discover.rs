//! URL, JavaScript and directory discovery for one domain.

use std::collections::HashSet;
use std::path::Path;

use futures::future::join_all;
use tracing::{info, instrument, warn};

use super::collect;
use crate::adapters::{Adapted, adapter_for};
use crate::discovery::{merge, merge_secrets};
use crate::tools::{Invocation, Tool, ToolExecutor};
use crate::{Config, Record, Report, Result, Secret};

/// Knobs for a discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    /// Tools not to run.
    pub skip: HashSet<Tool>,
}

impl DiscoverOptions {
    /// Skip the given tools.
    #[must_use]
    pub fn skipping(skip: impl IntoIterator<Item = Tool>) -> Self {
        Self {
            skip: skip.into_iter().collect(),
        }
    }
}

/// Run every discovery tool against `domain` and merge their results.
///
/// The report always carries `URLS` and `secrets` (possibly empty);
/// `waybackurls` is present when waybackurls was not skipped. URL records
/// are merged in [`Tool::DISCOVERY_ORDER`]; secrets come from JSRecon, then
/// SecretFinder.
///
/// # Errors
///
/// Returns an error only if the scratch directory for ffuf output cannot
/// be created. Tool failures are logged and skipped.
#[instrument(skip_all, fields(domain = %domain))]
pub async fn discover<E: ToolExecutor>(
    executor: &E,
    domain: &str,
    options: &DiscoverOptions,
) -> Result<Report> {
    let scratch = tempfile::tempdir()?;
    let config = executor.config();

    let invocations: Vec<Invocation> = Tool::DISCOVERY_ORDER
        .into_iter()
        .filter(|tool| !options.skip.contains(tool))
        .filter_map(|tool| invocation_for(tool, domain, config, scratch.path()))
        .collect();

    info!(tools = invocations.len(), "running discovery tools");
    let outputs = join_all(
        invocations
            .into_iter()
            .map(|inv| async move { (inv.tool, collect(executor, inv).await) }),
    )
    .await;

    let mut record_sections: Vec<Vec<Record>> = Vec::new();
    let mut secret_sections: Vec<Vec<Secret>> = Vec::new();
    let mut archive: Option<Vec<String>> = None;

    for (tool, output) in outputs {
        let lines = output.lines();

        if tool == Tool::Waybackurls {
            archive = Some(
                lines
                    .iter()
                    .map(|line| line.trim())
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
            if !config.defaults.merge_archive_urls {
                continue;
            }
        }

        let Some(adapter) = adapter_for(tool) else {
            continue;
        };
        let Adapted { records, secrets, .. } = adapter.adapt(&lines, domain);
        info!(%tool, records = records.len(), secrets = secrets.len(), "adapted");
        record_sections.push(records);
        secret_sections.push(secrets);
    }

    let urls = merge(record_sections);
    let secrets = merge_secrets(secret_sections);
    info!(urls = urls.len(), secrets = secrets.len(), "discovery merged");

    Ok(Report {
        urls: Some(urls),
        secrets: Some(secrets),
        waybackurls: archive,
        ..Report::default()
    })
}

/// Built-in arguments for each discovery tool.
///
/// Returns `None` when the tool cannot run with the current config (ffuf
/// without a wordlist).
fn invocation_for(tool: Tool, domain: &str, config: &Config, scratch: &Path) -> Option<Invocation> {
    let url = format!("https://{domain}");
    let invocation = Invocation::new(tool);

    let invocation = match tool {
        Tool::Gau => invocation.args([domain, "--json"]),
        Tool::Gospider => invocation.args([
            "-s",
            url.as_str(),
            "--json",
            "--js",
            "--subs",
            "--sitemap",
            "--robots",
        ]),
        Tool::Hakrawler => invocation.args(["-json", "-subs", "-u"]).stdin(url),
        Tool::Waybackurls => invocation.stdin(domain),
        Tool::JsRecon => invocation.args(["--url", url.as_str(), "--show-sensitive"]),
        Tool::LinkFinder => invocation.args(["-i", url.as_str(), "-d", "-o", "cli"]),
        Tool::SecretFinder => invocation.args(["-i", url.as_str(), "-e", "-o", "cli"]),
        Tool::Ffuf => {
            let Some(wordlist) = &config.wordlists.directories else {
                warn!("no [wordlists] directories configured, skipping ffuf");
                return None;
            };
            let out_file = scratch.join("ffuf.json");
            invocation
                .args([
                    "-u".to_string(),
                    format!("{url}/FUZZ"),
                    "-w".to_string(),
                    wordlist.display().to_string(),
                    "-t".to_string(),
                    config.defaults.ffuf_threads.to_string(),
                    "-of".to_string(),
                    "json".to_string(),
                    "-o".to_string(),
                    out_file.display().to_string(),
                    "-fc".to_string(),
                    "404".to_string(),
                    "-ac".to_string(),
                ])
                .capture_file(out_file)
        },
        _ => return None,
    };
    Some(invocation)
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
    use crate::Category;
    use crate::pipeline::testing::FakeExecutor;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn urls(report: &Report) -> Vec<&str> {
        report
            .urls
            .as_ref()
            .unwrap()
            .iter()
            .map(|r| r.url.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_relative_and_absolute_merge_to_one_record() {
        let executor = FakeExecutor::new(Config::default())
            .with(Tool::Gau, r#"{"url":"/a.js"}"#)
            .with(Tool::Hakrawler, r#"{"URL":"https://example.com/a.js"}"#);

        let report = discover(&executor, "example.com", &DiscoverOptions::default())
            .await
            .unwrap();

        let records = report.urls.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.com/a.js");
        assert_eq!(records[0].category, Category::Javascript);
    }

    #[tokio::test]
    async fn test_merge_follows_declared_order() {
        // secretfinder output is listed first here but merges after jsrecon
        let executor = FakeExecutor::new(Config::default())
            .with(
                Tool::SecretFinder,
                "[ + ] URL: https://example.com/sf.js\napi_key -> 123",
            )
            .with(Tool::JsRecon, "/js-first\nTOKEN_ABC")
            .with(Tool::Gau, r#"{"url":"https://example.com/gau"}"#)
            .with(Tool::LinkFinder, "/js-first\n/lf");

        let report = discover(&executor, "example.com", &DiscoverOptions::default())
            .await
            .unwrap();

        assert_eq!(
            urls(&report),
            vec![
                "https://example.com/gau",
                "https://example.com/js-first",
                "https://example.com/lf",
                "https://example.com/sf.js",
            ]
        );
        assert_eq!(report.secrets.unwrap(), vec!["TOKEN_ABC", "api_key: 123"]);
    }

    #[tokio::test]
    async fn test_failed_tools_degrade_to_empty() {
        let executor = FakeExecutor::new(Config::default())
            .failing(Tool::Gau)
            .with(Tool::Gospider, r#"{"input":"https://example.com","output":"/ok"}"#);

        let report = discover(&executor, "example.com", &DiscoverOptions::default())
            .await
            .unwrap();
        assert_eq!(urls(&report), vec!["https://example.com/ok"]);
    }

    #[tokio::test]
    async fn test_no_output_gives_empty_sections() {
        let executor = FakeExecutor::new(Config::default());
        let report = discover(&executor, "example.com", &DiscoverOptions::default())
            .await
            .unwrap();

        assert_eq!(report.urls, Some(Vec::new()));
        assert_eq!(report.secrets, Some(Vec::new()));
        assert_eq!(report.waybackurls, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_wayback_kept_separate_by_default() {
        let executor = FakeExecutor::new(Config::default()).with(
            Tool::Waybackurls,
            "https://example.com/old.php\n\nhttps://other.org/x\n",
        );
        let report = discover(&executor, "example.com", &DiscoverOptions::default())
            .await
            .unwrap();

        assert!(report.urls.unwrap().is_empty());
        assert_eq!(
            report.waybackurls.unwrap(),
            vec!["https://example.com/old.php", "https://other.org/x"]
        );
    }

    #[tokio::test]
    async fn test_wayback_merged_when_enabled() {
        let mut config = Config::default();
        config.defaults.merge_archive_urls = true;
        let executor = FakeExecutor::new(config).with(
            Tool::Waybackurls,
            "https://example.com/old.php\nhttps://other.org/x\n",
        );
        let report = discover(&executor, "example.com", &DiscoverOptions::default())
            .await
            .unwrap();

        assert_eq!(urls(&report), vec!["https://example.com/old.php"]);
    }

    #[tokio::test]
    async fn test_skip_and_invocation_shapes() {
        let executor = FakeExecutor::new(Config::default());
        let options = DiscoverOptions::skipping([Tool::Gospider, Tool::Waybackurls]);
        let report = discover(&executor, "example.com", &options).await.unwrap();

        assert!(report.waybackurls.is_none());
        assert!(executor.invocation(Tool::Gospider).is_none());
        // no wordlist configured
        assert!(executor.invocation(Tool::Ffuf).is_none());

        let hakrawler = executor.invocation(Tool::Hakrawler).unwrap();
        assert_eq!(hakrawler.args, vec!["-json", "-subs", "-u"]);
        assert_eq!(hakrawler.stdin.as_deref(), Some("https://example.com"));

        let gau = executor.invocation(Tool::Gau).unwrap();
        assert_eq!(gau.args, vec!["example.com", "--json"]);
    }

    #[tokio::test]
    async fn test_ffuf_runs_with_wordlist() {
        let mut config = Config::default();
        config.wordlists.directories = Some(PathBuf::from("/lists/dirs.txt"));
        config.defaults.ffuf_threads = 50;
        let executor = FakeExecutor::new(config).with(
            Tool::Ffuf,
            r#"{"results":[{"url":"https://example.com/admin"}]}"#,
        );

        let report = discover(&executor, "example.com", &DiscoverOptions::default())
            .await
            .unwrap();
        assert_eq!(urls(&report), vec!["https://example.com/admin"]);

        let ffuf = executor.invocation(Tool::Ffuf).unwrap();
        assert_eq!(&ffuf.args[..4], ["-u", "https://example.com/FUZZ", "-w", "/lists/dirs.txt"]);
        assert_eq!(ffuf.args[5], "50");
        assert!(ffuf.capture_file.unwrap().ends_with("ffuf.json"));
    }
}
