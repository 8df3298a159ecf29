//! End-to-end workflows: run tools concurrently, adapt, merge, report.
//!
//! Each pipeline fans out one future per tool and waits for all of them
//! before any output is interpreted. A tool that is missing, fails or times
//! out contributes nothing; the run itself only fails on local I/O errors.

pub mod cms;
pub mod discover;
pub mod params;
pub mod ports;
pub mod secrets;
pub mod subdomains;
pub mod vulns;
pub mod waf;

use tracing::{debug, warn};

use crate::tools::{Invocation, ToolExecutor, ToolOutput};

pub use cms::scan_cms;
pub use discover::{DiscoverOptions, discover};
pub use params::discover_parameters;
pub use ports::{PortScanOptions, scan_ports};
pub use secrets::scan_repository;
pub use subdomains::enumerate_subdomains;
pub use vulns::scan_vulnerabilities;
pub use waf::detect_waf;

/// Run one invocation, degrading any failure to empty output.
pub(crate) async fn collect<E: ToolExecutor>(executor: &E, invocation: Invocation) -> ToolOutput {
    let tool = invocation.tool;
    match executor.execute(invocation).await {
        Ok(output) => {
            debug!(%tool, bytes = output.stdout.len(), "tool finished");
            output
        },
        Err(e) => {
            warn!(%tool, category = e.category(), "{e}");
            ToolOutput::default()
        },
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::disallowed_macros,
    clippy::unnecessary_wraps
)]
pub(crate) mod testing {
    //! Canned-output executor for pipeline tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::tools::{Invocation, Tool, ToolExecutor, ToolOutput};
    use crate::{Config, Error, Result};

    /// Replays fixed output per tool and records every invocation.
    #[derive(Default)]
    pub struct FakeExecutor {
        pub config: Config,
        outputs: HashMap<Tool, Result<ToolOutput>>,
        pub calls: Mutex<Vec<Invocation>>,
    }

    impl FakeExecutor {
        pub fn new(config: Config) -> Self {
            Self {
                config,
                ..Self::default()
            }
        }

        pub fn with(mut self, tool: Tool, stdout: &str) -> Self {
            self.outputs.insert(tool, Ok(ToolOutput::from_stdout(stdout)));
            self
        }

        pub fn with_output(mut self, tool: Tool, output: ToolOutput) -> Self {
            self.outputs.insert(tool, Ok(output));
            self
        }

        pub fn failing(mut self, tool: Tool) -> Self {
            self.outputs.insert(
                tool,
                Err(Error::ToolFailed {
                    tool: tool.name().to_string(),
                    reason: "exit code 1".into(),
                }),
            );
            self
        }

        pub fn invocation(&self, tool: Tool) -> Option<Invocation> {
            self.invocations(tool).into_iter().next()
        }

        pub fn invocations(&self, tool: Tool) -> Vec<Invocation> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|inv| inv.tool == tool)
                .cloned()
                .collect()
        }
    }

    impl ToolExecutor for FakeExecutor {
        async fn execute(&self, invocation: Invocation) -> Result<ToolOutput> {
            let tool = invocation.tool;
            self.calls.lock().unwrap().push(invocation);
            match self.outputs.get(&tool) {
                Some(Ok(output)) => Ok(output.clone()),
                Some(Err(e)) => Err(Error::Other(e.to_string())),
                None => Err(Error::ToolNotInstalled {
                    tool: tool.name().to_string(),
                }),
            }
        }

        fn config(&self) -> &Config {
            &self.config
        }
    }
}
