//! HTTP parameter discovery with x8 and arjun.

use std::path::Path;

use futures::future::OptionFuture;
use tracing::{info, instrument, warn};

use super::collect;
use crate::adapters::{Parameters, parse_arjun, parse_x8};
use crate::tools::{Invocation, Tool, ToolExecutor};
use crate::{Config, Report, Result};

/// Run x8 and arjun against `url` concurrently.
///
/// The report carries `target` and `parameters`. x8 is skipped when no
/// `[wordlists] parameters` list is configured.
///
/// # Errors
///
/// Returns an error only if the scratch directory for x8's report cannot be
/// created. Tool failures are logged and skipped.
#[instrument(skip_all, fields(url = %url))]
pub async fn discover_parameters<E: ToolExecutor>(executor: &E, url: &str) -> Result<Report> {
    let scratch = tempfile::tempdir()?;

    let x8 = x8_invocation(executor.config(), url, scratch.path());
    let arjun = Invocation::new(Tool::Arjun).args(["-u", url]);

    let (x8, arjun) = tokio::join!(
        OptionFuture::from(x8.map(|inv| collect(executor, inv))),
        collect(executor, arjun),
    );

    let (arjun_extracted, arjun_detected) = parse_arjun(&arjun.lines());
    let parameters = Parameters {
        x8: x8.map(|out| parse_x8(&out.stdout)).unwrap_or_default(),
        arjun_extracted,
        arjun_detected,
    };
    info!(
        x8 = parameters.x8.len(),
        arjun = parameters.arjun_detected.len(),
        "parameters found"
    );

    Ok(Report {
        target: Some(url.to_string()),
        parameters: Some(parameters),
        ..Report::default()
    })
}

fn x8_invocation(config: &Config, url: &str, scratch: &Path) -> Option<Invocation> {
    let Some(wordlist) = &config.wordlists.parameters else {
        warn!("no [wordlists] parameters configured, skipping x8");
        return None;
    };
    let out_file = scratch.join("x8.json");
    Some(
        Invocation::new(Tool::X8)
            .args([
                "-u".to_string(),
                url.to_string(),
                "-w".to_string(),
                wordlist.display().to_string(),
                "-O".to_string(),
                "json".to_string(),
                "-o".to_string(),
                out_file.display().to_string(),
            ])
            .capture_file(out_file),
    )
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
    use crate::pipeline::testing::FakeExecutor;
    use std::path::PathBuf;

    const ARJUN: &str = "[+] Extracted 2 parameters from response for testing: q, lang\n\
                         [✓] parameter detected: q, based on: body length\n";

    #[tokio::test]
    async fn test_both_tools() {
        let mut config = Config::default();
        config.wordlists.parameters = Some(PathBuf::from("/lists/params.txt"));
        let executor = FakeExecutor::new(config)
            .with(Tool::X8, r#"[{"found_params":[{"name":"debug"}]}]"#)
            .with(Tool::Arjun, ARJUN);

        let report = discover_parameters(&executor, "https://example.com/search")
            .await
            .unwrap();
        let parameters = report.parameters.unwrap();
        assert_eq!(parameters.x8, vec!["debug"]);
        assert_eq!(parameters.arjun_extracted, vec!["q", "lang"]);
        assert_eq!(parameters.arjun_detected, vec!["q"]);

        let x8 = executor.invocation(Tool::X8).unwrap();
        assert_eq!(x8.args[..4], ["-u", "https://example.com/search", "-w", "/lists/params.txt"]);
        assert!(x8.capture_file.is_some());
        let arjun = executor.invocation(Tool::Arjun).unwrap();
        assert_eq!(arjun.args, ["-u", "https://example.com/search"]);
    }

    #[tokio::test]
    async fn test_x8_needs_a_wordlist() {
        let executor = FakeExecutor::new(Config::default())
            .with(Tool::X8, r#"[{"found_params":["never"]}]"#)
            .with(Tool::Arjun, ARJUN);

        let report = discover_parameters(&executor, "https://example.com")
            .await
            .unwrap();
        assert!(executor.invocation(Tool::X8).is_none());
        let parameters = report.parameters.unwrap();
        assert!(parameters.x8.is_empty());
        assert_eq!(parameters.arjun_detected, vec!["q"]);
    }
}
