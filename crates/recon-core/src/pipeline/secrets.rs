//! Secret scanning of a git repository.

use tracing::{info, instrument};

use super::collect;
use crate::adapters::{SourceAdapter, TrufflehogAdapter};
use crate::tools::{Invocation, Tool, ToolExecutor};
use crate::Report;

/// Scan `repo` with trufflehog.
///
/// GitHub repositories go through trufflehog's `github` source, anything
/// else through `git`. The report carries `target` and `secrets`.
#[instrument(skip_all, fields(repo = %repo))]
pub async fn scan_repository<E: ToolExecutor>(executor: &E, repo: &str) -> Report {
    let invocation = if repo.contains("github.com") {
        Invocation::new(Tool::Trufflehog).args(["github", "--repo", repo])
    } else {
        Invocation::new(Tool::Trufflehog).args(["git", repo])
    };
    let output = collect(executor, invocation.arg("--json")).await;

    let secrets = TrufflehogAdapter.adapt(&output.lines(), repo).secrets;
    info!(count = secrets.len(), "secrets found");

    Report {
        target: Some(repo.to_string()),
        secrets: Some(secrets),
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

    #[tokio::test]
    async fn test_github_repository() {
        let executor = FakeExecutor::new(Config::default()).with(
            Tool::Trufflehog,
            "{\"DetectorName\":\"AWS\",\"Raw\":\"AKIA1\"}\nnot json\n",
        );

        let report = scan_repository(&executor, "https://github.com/acme/app").await;
        assert_eq!(report.target.as_deref(), Some("https://github.com/acme/app"));
        assert_eq!(report.secrets, Some(vec!["AWS: AKIA1".to_string()]));

        let inv = executor.invocation(Tool::Trufflehog).unwrap();
        assert_eq!(
            inv.args,
            ["github", "--repo", "https://github.com/acme/app", "--json"]
        );
    }

    #[tokio::test]
    async fn test_other_git_host_and_missing_tool() {
        let executor = FakeExecutor::new(Config::default());
        let report = scan_repository(&executor, "https://gitlab.example.com/team/api.git").await;

        assert_eq!(report.secrets, Some(Vec::new()));
        let inv = executor.invocation(Tool::Trufflehog).unwrap();
        assert_eq!(
            inv.args,
            ["git", "https://gitlab.example.com/team/api.git", "--json"]
        );
    }
}
