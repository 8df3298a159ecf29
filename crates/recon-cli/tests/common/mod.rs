#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Scratch area for one test: a config file, an empty `PATH` directory and
/// a place for reports and fake tools.
#[allow(dead_code)]
pub struct Sandbox {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create sandbox");
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("recon.toml")
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).unwrap();
    }

    /// Install an executable shell script that prints `stdout`.
    ///
    /// The script sets its own `PATH` since [`Sandbox::cmd`] hides the
    /// system one.
    #[cfg(unix)]
    pub fn fake_tool(&self, name: &str, stdout: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join(name);
        let script = format!("#!/bin/sh\nPATH=/usr/bin:/bin\ncat <<'__RECON_EOF__'\n{stdout}\n__RECON_EOF__\n");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A `recon` command that cannot see any real tools or the user's
    /// config.
    pub fn cmd(&self) -> Command {
        let mut cmd = recon_cmd();
        cmd.env("PATH", self.path().join("bin"));
        cmd.env("RECON_CONFIG", self.config_path());
        cmd
    }
}

/// Create a `recon` command suitable for integration tests.
#[allow(dead_code)]
pub fn recon_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("recon"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RECON_OUTPUT_FORMAT");
    cmd
}

#[allow(dead_code)]
pub fn read_json(path: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&raw).unwrap()
}
