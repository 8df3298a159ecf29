//! Running tools as subprocesses.
//!
//! Pipelines talk to tools through the [`ToolExecutor`] trait so they can be
//! driven by canned output in tests; [`ToolRunner`] is the real
//! implementation backed by `tokio::process`.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::{Tool, locate};
use crate::{Config, Error, Result};

/// One tool invocation: built-in arguments plus optional stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Tool to run.
    pub tool: Tool,
    /// Built-in arguments. Configured extra arguments are appended by the
    /// runner.
    pub args: Vec<String>,
    /// Text written to the tool's stdin, which is then closed.
    pub stdin: Option<String>,
    /// File the tool writes its results to instead of stdout.
    ///
    /// When set and present after the run, its contents replace stdout.
    pub capture_file: Option<PathBuf>,
}

impl Invocation {
    /// A bare invocation with no arguments.
    #[must_use]
    pub const fn new(tool: Tool) -> Self {
        Self {
            tool,
            args: Vec::new(),
            stdin: None,
            capture_file: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Feed `input` to the tool's stdin.
    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Read results from `path` after the run.
    #[must_use]
    pub fn capture_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.capture_file = Some(path.into());
        self
    }
}

/// Captured output of a finished tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Standard output, or the capture file contents.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub status: Option<i32>,
}

impl ToolOutput {
    /// Output with the given stdout and a zero exit code.
    #[must_use]
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            status: Some(0),
        }
    }

    /// Stdout split into owned lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.stdout.lines().map(str::to_string).collect()
    }

    /// Stderr split into owned lines.
    #[must_use]
    pub fn stderr_lines(&self) -> Vec<String> {
        self.stderr.lines().map(str::to_string).collect()
    }
}

/// Something that can run a tool invocation.
pub trait ToolExecutor: Send + Sync {
    /// Run `invocation` to completion.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::ToolNotInstalled`],
    /// [`Error::ToolFailed`] or [`Error::Timeout`]; pipelines treat all of
    /// them as "no output from this source".
    fn execute(&self, invocation: Invocation) -> impl Future<Output = Result<ToolOutput>> + Send;

    /// The configuration the executor runs with.
    fn config(&self) -> &Config;
}

/// Runs tools as child processes using paths, arguments and timeouts from
/// [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ToolRunner {
    config: Config,
}

impl ToolRunner {
    /// Create a runner.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    async fn command_for(&self, tool: Tool) -> Result<Command> {
        let path = locate(tool, &self.config).await?;
        let interpreter = self
            .config
            .tool(tool)
            .and_then(|settings| settings.interpreter.as_deref());

        let command = match interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(path);
                command
            },
            None => Command::new(path),
        };
        Ok(command)
    }
}

impl ToolExecutor for ToolRunner {
    #[instrument(level = "debug", skip(self, invocation), fields(tool = %invocation.tool))]
    async fn execute(&self, invocation: Invocation) -> Result<ToolOutput> {
        let tool = invocation.tool;
        let timeout = self.config.tool_timeout(tool);
        let mut command = self.command_for(tool).await?;

        command
            .args(&invocation.args)
            .args(self.config.tool_args(tool))
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(args = ?invocation.args, timeout_secs = timeout.as_secs(), "spawning tool");

        let mut child = command.spawn().map_err(|e| Error::ToolFailed {
            tool: tool.name().to_string(),
            reason: format!("failed to start: {e}"),
        })?;

        if let (Some(mut pipe), Some(input)) = (child.stdin.take(), invocation.stdin) {
            tokio::spawn(async move {
                if let Err(e) = pipe.write_all(input.as_bytes()).await {
                    debug!(%tool, error = %e, "tool closed stdin early");
                }
            });
        }

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                Error::Timeout(format!("{tool} timed out after {}s", timeout.as_secs()))
            })?
            .map_err(Error::Io)?;

        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if let Some(path) = &invocation.capture_file {
            match tokio::fs::read_to_string(path).await {
                Ok(contents) => stdout = contents,
                Err(e) => debug!(path = %path.display(), error = %e, "no capture file"),
            }
        }

        if !output.status.success() && stdout.trim().is_empty() {
            debug!(
                exit_code = ?output.status.code(),
                stderr = %stderr.trim(),
                "tool exited with an error and no output"
            );
            return Err(Error::ToolFailed {
                tool: tool.name().to_string(),
                reason: failure_reason(output.status.code(), &stderr),
            });
        }

        Ok(ToolOutput {
            stdout,
            stderr,
            status: output.status.code(),
        })
    }

    fn config(&self) -> &Config {
        &self.config
    }
}

fn failure_reason(code: Option<i32>, stderr: &str) -> String {
    let last_line = stderr.lines().rev().find(|line| !line.trim().is_empty());
    match (code, last_line) {
        (Some(code), Some(line)) => format!("exit code {code}: {}", line.trim()),
        (Some(code), None) => format!("exit code {code}"),
        (None, Some(line)) => format!("terminated by signal: {}", line.trim()),
        (None, None) => "terminated by signal".to_string(),
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

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new(Tool::Hakrawler)
            .args(["-json", "-subs"])
            .arg("-u")
            .stdin("https://example.com");

        assert_eq!(inv.args, vec!["-json", "-subs", "-u"]);
        assert_eq!(inv.stdin.as_deref(), Some("https://example.com"));
        assert!(inv.capture_file.is_none());
    }

    #[test]
    fn test_output_lines() {
        let out = ToolOutput {
            stdout: "a\nb\n".into(),
            stderr: "warn\n".into(),
            status: Some(0),
        };
        assert_eq!(out.lines(), vec!["a", "b"]);
        assert_eq!(out.stderr_lines(), vec!["warn"]);
    }

    #[test]
    fn test_failure_reason_uses_last_stderr_line() {
        assert_eq!(
            failure_reason(Some(2), "starting\nerror: bad flag\n\n"),
            "exit code 2: error: bad flag"
        );
        assert_eq!(failure_reason(Some(1), ""), "exit code 1");
        assert_eq!(failure_reason(None, ""), "terminated by signal");
    }

    #[tokio::test]
    async fn test_missing_tool_is_not_installed() {
        let mut config = Config::default();
        config.tools.insert(
            "gau".into(),
            crate::config::ToolSettings {
                path: Some(PathBuf::from("/definitely/not/here/gau")),
                ..Default::default()
            },
        );
        let runner = ToolRunner::new(config);
        let err = runner.execute(Invocation::new(Tool::Gau)).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotInstalled { .. }));
    }

    #[cfg(unix)]
    mod unix {
        use crate::config::ToolSettings;
        use crate::tools::{Invocation, Tool, ToolExecutor, ToolRunner};
        use crate::{Config, Error};
        use std::path::PathBuf;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;
        use tempfile::TempDir;

        fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn runner_for(tool: Tool, path: PathBuf, settings: ToolSettings) -> ToolRunner {
            let mut config = Config::default();
            config.tools.insert(
                tool.name().to_string(),
                ToolSettings {
                    path: Some(path),
                    ..settings
                },
            );
            ToolRunner::new(config)
        }

        #[tokio::test]
        async fn test_args_and_stdin_reach_the_tool() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "waybackurls", r#"echo "args:$*"; cat"#);
            let runner = runner_for(
                Tool::Waybackurls,
                path,
                ToolSettings {
                    args: vec!["-no-subs".into()],
                    ..Default::default()
                },
            );

            let out = runner
                .execute(Invocation::new(Tool::Waybackurls).arg("-dates").stdin("example.com\n"))
                .await
                .unwrap();
            assert_eq!(out.lines(), vec!["args:-dates -no-subs", "example.com"]);
            assert_eq!(out.status, Some(0));
        }

        #[tokio::test]
        async fn test_nonzero_exit_with_output_is_kept() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "gau", "echo partial; exit 3");
            let runner = runner_for(Tool::Gau, path, ToolSettings::default());

            let out = runner.execute(Invocation::new(Tool::Gau)).await.unwrap();
            assert_eq!(out.stdout.trim(), "partial");
            assert_eq!(out.status, Some(3));
        }

        #[tokio::test]
        async fn test_nonzero_exit_without_output_fails() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "gau", "echo 'rate limited' >&2; exit 1");
            let runner = runner_for(Tool::Gau, path, ToolSettings::default());

            let err = runner.execute(Invocation::new(Tool::Gau)).await.unwrap_err();
            match err {
                Error::ToolFailed { tool, reason } => {
                    assert_eq!(tool, "gau");
                    assert_eq!(reason, "exit code 1: rate limited");
                },
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_timeout() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "naabu", "sleep 5");
            let runner = runner_for(
                Tool::Naabu,
                path,
                ToolSettings {
                    timeout_secs: Some(1),
                    ..Default::default()
                },
            );

            let started = std::time::Instant::now();
            let err = runner.execute(Invocation::new(Tool::Naabu)).await.unwrap_err();
            assert!(matches!(err, Error::Timeout(_)));
            assert!(err.is_recoverable());
            assert!(started.elapsed() < Duration::from_secs(4));
        }

        #[tokio::test]
        async fn test_capture_file_replaces_stdout() {
            let dir = TempDir::new().unwrap();
            let out_file = dir.path().join("ffuf.json");
            let path = script(&dir, "ffuf", r#"echo progress; echo '{"results":[]}' > "$2""#);
            let runner = runner_for(Tool::Ffuf, path, ToolSettings::default());

            let out = runner
                .execute(
                    Invocation::new(Tool::Ffuf)
                        .args(["-o".to_string(), out_file.display().to_string()])
                        .capture_file(&out_file),
                )
                .await
                .unwrap();
            assert_eq!(out.stdout.trim(), r#"{"results":[]}"#);
        }

        #[tokio::test]
        async fn test_interpreter_runs_script() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("linkfinder.sh");
            std::fs::write(&path, "echo /from-script.js\n").unwrap();
            let runner = runner_for(
                Tool::LinkFinder,
                path,
                ToolSettings {
                    interpreter: Some("sh".into()),
                    ..Default::default()
                },
            );

            let out = runner.execute(Invocation::new(Tool::LinkFinder)).await.unwrap();
            assert_eq!(out.lines(), vec!["/from-script.js"]);
        }
    }
}
