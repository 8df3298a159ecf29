//! Configuration for tool locations, arguments, timeouts and output paths.
//!
//! Configuration is stored in TOML. Every section is optional; missing keys
//! fall back to defaults, so an empty file is a valid configuration.
//!
//! ## Resolution Order
//!
//! 1. An explicit path (`recon --config <path>`)
//! 2. The `RECON_CONFIG` environment variable
//! 3. `global.toml` in the platform config directory
//!
//! A resolved path that does not exist yields the default configuration.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [paths]
//! output_dir = "/srv/recon/outputs"
//!
//! [defaults]
//! tool_timeout_secs = 600
//!
//! [httpx]
//! timeout = 30
//! retries = 2
//!
//! [wordlists]
//! directories = "/usr/share/wordlists/dirb/common.txt"
//! parameters = "/usr/share/wordlists/burp-parameter-names.txt"
//!
//! [tools.wpscan]
//! args = ["--api-token", "..."]
//!
//! [tools.linkfinder]
//! path = "/opt/LinkFinder/linkfinder.py"
//! interpreter = "python3"
//!
//! [tools.gau]
//! args = ["--threads", "5"]
//! timeout_secs = 120
//! ```
//!
//! ```rust
//! use recon_core::{Config, Tool};
//! use std::time::Duration;
//!
//! let config: Config = toml::from_str("[defaults]\ntool_timeout_secs = 60").unwrap();
//! assert_eq!(config.tool_timeout(Tool::Gau), Duration::from_secs(60));
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Tool};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RECON_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where reports are written.
    pub paths: PathsConfig,
    /// Settings shared by every tool.
    pub defaults: DefaultsConfig,
    /// Request settings passed to httpx.
    pub httpx: HttpxConfig,
    /// Wordlists for brute-force tools.
    pub wordlists: WordlistsConfig,
    /// Per-tool overrides keyed by tool name (`gau`, `linkfinder`, ...).
    pub tools: BTreeMap<String, ToolSettings>,
}

/// File system paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory reports are written to when no explicit output is given.
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
        }
    }
}

/// Settings that apply to every tool unless overridden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Wall-clock limit for a single tool invocation, in seconds.
    pub tool_timeout_secs: u64,

    /// Concurrent requests for ffuf (`-t`).
    pub ffuf_threads: u32,

    /// Also fold archived waybackurls results into `URLS`.
    ///
    /// Off by default: archive results are large and mostly stale, so they
    /// are kept in their own `waybackurls` report section.
    pub merge_archive_urls: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 300,
            ffuf_threads: 1000,
            merge_archive_urls: false,
        }
    }
}

/// httpx request settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpxConfig {
    /// Per-request timeout in seconds (`-timeout`).
    pub timeout: u32,
    /// Retries per request (`-retries`).
    pub retries: u32,
}

impl Default for HttpxConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            retries: 2,
        }
    }
}

/// Wordlist locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordlistsConfig {
    /// Wordlist for directory fuzzing. ffuf is skipped when unset.
    pub directories: Option<PathBuf>,
    /// Parameter names for x8. x8 is skipped when unset.
    pub parameters: Option<PathBuf>,
}

/// Overrides for one external tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Executable (or script) path. Looked up in `PATH` when unset.
    pub path: Option<PathBuf>,
    /// Interpreter to run `path` with, e.g. `python3` for script tools.
    pub interpreter: Option<String>,
    /// Extra arguments appended after the built-in ones.
    pub args: Vec<String>,
    /// Timeout override in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration, resolving the file location.
    ///
    /// # Errors
    ///
    /// Returns an error if no location can be determined, or the resolved
    /// file exists but cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(explicit)?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or contains
    /// invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Resolve which config file applies.
    ///
    /// # Errors
    ///
    /// Returns an error if neither an explicit path nor `RECON_CONFIG` is
    /// set and the platform config directory cannot be determined.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        resolve_with(explicit, std::env::var_os(CONFIG_ENV))
    }

    /// The platform config file: `<config_dir>/global.toml`.
    ///
    /// - Linux: `~/.config/reconkit/global.toml`
    /// - macOS: `~/Library/Application Support/dev.reconkit.reconkit/global.toml`
    ///
    /// # Errors
    ///
    /// Returns an error on platforms without a home directory.
    pub fn global_path() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("dev", "reconkit", "reconkit")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(project_dirs.config_dir().join("global.toml"))
    }

    /// Overrides for `tool`, if any are configured.
    #[must_use]
    pub fn tool(&self, tool: Tool) -> Option<&ToolSettings> {
        self.tools.get(tool.name())
    }

    /// Effective timeout for `tool`.
    #[must_use]
    pub fn tool_timeout(&self, tool: Tool) -> Duration {
        let secs = self
            .tool(tool)
            .and_then(|settings| settings.timeout_secs)
            .unwrap_or(self.defaults.tool_timeout_secs);
        Duration::from_secs(secs)
    }

    /// Extra arguments configured for `tool`.
    #[must_use]
    pub fn tool_args(&self, tool: Tool) -> &[String] {
        self.tool(tool)
            .map(|settings| settings.args.as_slice())
            .unwrap_or_default()
    }
}

fn resolve_with(explicit: Option<&Path>, env: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Config::global_path()
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
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.paths.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.defaults.tool_timeout_secs, 300);
        assert_eq!(config.defaults.ffuf_threads, 1000);
        assert!(!config.defaults.merge_archive_urls);
        assert_eq!(config.httpx.timeout, 30);
        assert_eq!(config.httpx.retries, 2);
        assert!(config.wordlists.directories.is_none());
        assert!(config.wordlists.parameters.is_none());
        assert!(config.tools.is_empty());
    }

    #[test]
    fn test_empty_file_is_default() -> Result<()> {
        let config: Config = toml::from_str("")?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_sections_keep_defaults() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            [httpx]
            retries = 5

            [tools.gau]
            args = ["--threads", "5"]
            timeout_secs = 42

            [tools.linkfinder]
            path = "/opt/LinkFinder/linkfinder.py"
            interpreter = "python3"
            "#,
        )?;

        assert_eq!(config.httpx.retries, 5);
        assert_eq!(config.httpx.timeout, 30);
        assert_eq!(config.tool_timeout(Tool::Gau), Duration::from_secs(42));
        assert_eq!(config.tool_timeout(Tool::Ffuf), Duration::from_secs(300));
        assert_eq!(config.tool_args(Tool::Gau), ["--threads", "5"]);
        assert!(config.tool_args(Tool::Hakrawler).is_empty());

        let linkfinder = config.tool(Tool::LinkFinder).unwrap();
        assert_eq!(linkfinder.interpreter.as_deref(), Some("python3"));
        Ok(())
    }

    #[test]
    fn test_wordlists_and_wpscan_token() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            [wordlists]
            parameters = "/opt/lists/params.txt"

            [tools.wpscan]
            args = ["--api-token", "abc123"]
            "#,
        )?;

        assert_eq!(
            config.wordlists.parameters.as_deref(),
            Some(Path::new("/opt/lists/params.txt"))
        );
        assert!(config.wordlists.directories.is_none());
        assert_eq!(config.tool_args(Tool::Wpscan), ["--api-token", "abc123"]);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_default() -> Result<()> {
        let temp = TempDir::new()?;
        let config = Config::load_from(&temp.path().join("absent.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_invalid_toml() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "[defaults\ntool_timeout_secs = ")?;

        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("Failed to parse config"));
        Ok(())
    }

    #[test]
    fn test_load_wrong_type() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "[defaults]\ntool_timeout_secs = \"soon\"\n")?;

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn test_resolution_order() -> Result<()> {
        let explicit = PathBuf::from("/explicit.toml");
        let env = Some(OsString::from("/from-env.toml"));

        assert_eq!(resolve_with(Some(&explicit), env.clone())?, explicit);
        assert_eq!(resolve_with(None, env)?, PathBuf::from("/from-env.toml"));
        Ok(())
    }

    #[test]
    fn test_empty_env_falls_through() {
        let resolved = resolve_with(None, Some(OsString::new()));
        if let Ok(path) = resolved {
            assert!(path.ends_with("global.toml"));
        }
    }

    proptest! {
        #[test]
        fn test_timeout_roundtrip(secs in 1u64..=86_400) {
            let text = format!("[defaults]\ntool_timeout_secs = {secs}\n");
            let config: Config = toml::from_str(&text).unwrap();
            prop_assert_eq!(config.tool_timeout(Tool::Naabu), Duration::from_secs(secs));
        }
    }
}
