//! # CLI Structure and Argument Parsing
//!
//! `recon` drives the external recon tools and writes one JSON report per
//! run.
//!
//! ```bash
//! # URL, JavaScript and directory discovery
//! recon discover example.com
//! recon discover https://example.com --skip ffuf --skip gospider
//!
//! # Subdomains with liveness buckets
//! recon subdomains example.com --output scan.json
//!
//! # Open ports and per-port HTTP info
//! recon ports 10.0.0.1 --full
//!
//! # Deeper scanners
//! recon vulns https://example.com
//! recon params https://example.com/search
//! recon cms blog.example.com
//! recon waf example.com
//! recon secrets https://github.com/example/app
//!
//! # Combine earlier discovery reports
//! recon merge outputs/a.json outputs/b.json --output merged.json
//!
//! # Environment
//! recon tools
//! recon config path
//! ```
//!
//! Exit codes are listed in [`crate::error`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use recon_core::Tool;

use crate::args::OutputArgs;

/// Top-level `recon` command line.
#[derive(Parser, Clone, Debug)]
#[command(name = "recon")]
#[command(version)]
#[command(about = "recon - aggregate results from recon tools into JSON reports", long_about = None)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env).
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to the configuration file. Falls back to `RECON_CONFIG`, then
    /// the platform config directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Discover URLs, JavaScript files, directories and secrets for a domain
    Discover {
        /// Domain or URL (`https://example.com/x` is read as `example.com`)
        domain: String,

        /// Report path (default: `<output_dir>/<domain>_discovery_<timestamp>.json`)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Do not run this tool (repeatable)
        #[arg(long, value_name = "TOOL")]
        skip: Vec<Tool>,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Enumerate subdomains and sort them into alive, dead and check
    Subdomains {
        /// Domain or URL
        domain: String,

        /// Report path (default: `<output_dir>/<domain>_scan_<timestamp>.json`)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Scan a host for open ports and fingerprint their HTTP services
    Ports {
        /// Host name, IP address or URL
        target: String,

        /// Scan all 65535 ports instead of the top 100
        #[arg(long)]
        full: bool,

        /// Report path (default: `<output_dir>/<target>_ports_<timestamp>.json`)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Search a git repository for leaked secrets with trufflehog
    Secrets {
        /// Repository URL (GitHub repositories use trufflehog's GitHub source)
        repo: String,

        /// Report path (default: `<output_dir>/<repo>_secrets_<timestamp>.json`)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Run nuclei and nikto against a URL
    Vulns {
        /// URL or domain (a bare domain is scanned over https)
        target: String,

        /// Report path (default: `<output_dir>/<domain>_vulns_<timestamp>.json`)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Find HTTP parameters a URL accepts with x8 and arjun
    Params {
        /// URL or domain (a bare domain is scanned over https)
        target: String,

        /// Report path (default: `<output_dir>/<domain>_params_<timestamp>.json`)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Fingerprint a WordPress site with wpscan
    Cms {
        /// URL or domain (a bare domain is scanned over https)
        target: String,

        /// Report path (default: `<output_dir>/<domain>_cms_<timestamp>.json`)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Detect a web application firewall with wafw00f
    Waf {
        /// URL or domain (a bare domain is scanned over https)
        target: String,

        /// Report path (default: `<output_dir>/<domain>_waf_<timestamp>.json`)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Merge the URLS and secrets of earlier discovery reports
    Merge {
        /// Reports to merge, in priority order
        #[arg(required = true, value_name = "REPORT")]
        reports: Vec<PathBuf>,

        /// Where to write the merged report
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,

        #[command(flatten)]
        format: OutputArgs,
    },

    /// Show which external tools are installed
    Tools {
        #[command(flatten)]
        format: OutputArgs,
    },

    /// Inspect configuration
    Config {
        /// Config action
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// `recon config` actions.
#[derive(Subcommand, Clone, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show {
        #[command(flatten)]
        format: OutputArgs,
    },
    /// Print the resolved configuration file path
    Path,
}

impl Commands {
    /// The `--format` group of this command, if it has one.
    #[must_use]
    pub const fn output_args(&self) -> Option<&OutputArgs> {
        match self {
            Self::Discover { format, .. }
            | Self::Subdomains { format, .. }
            | Self::Ports { format, .. }
            | Self::Secrets { format, .. }
            | Self::Vulns { format, .. }
            | Self::Params { format, .. }
            | Self::Cms { format, .. }
            | Self::Waf { format, .. }
            | Self::Merge { format, .. }
            | Self::Tools { format }
            | Self::Config {
                command: ConfigCommands::Show { format },
            } => Some(format),
            Self::Config {
                command: ConfigCommands::Path,
            } => None,
        }
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
    use crate::args::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_comes_from_workspace() {
        let version = Cli::command().render_version();
        assert_eq!(version.trim(), "recon 0.1.0");
    }

    #[test]
    fn test_discover_with_skips() {
        let cli = Cli::try_parse_from([
            "recon",
            "discover",
            "https://example.com/login",
            "--skip",
            "ffuf",
            "--skip",
            "SecretFinder",
            "-f",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Discover {
                domain,
                skip,
                format,
                output,
            } => {
                assert_eq!(domain, "https://example.com/login");
                assert_eq!(skip, vec![Tool::Ffuf, Tool::SecretFinder]);
                assert_eq!(format.format, Some(OutputFormat::Json));
                assert!(output.is_none());
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_skip_tool_is_rejected() {
        let result = Cli::try_parse_from(["recon", "discover", "example.com", "--skip", "masscan"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "recon",
            "ports",
            "10.0.0.1",
            "--full",
            "-q",
            "--config",
            "/tmp/recon.toml",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/recon.toml")));
        assert!(matches!(cli.command, Commands::Ports { full: true, .. }));
    }

    #[test]
    fn test_scanner_commands_parse() {
        let cli = Cli::try_parse_from(["recon", "vulns", "https://example.com", "-o", "v.json"])
            .unwrap();
        match cli.command {
            Commands::Vulns { target, output, .. } => {
                assert_eq!(target, "https://example.com");
                assert_eq!(output, Some(PathBuf::from("v.json")));
            },
            other => panic!("unexpected {other:?}"),
        }

        for name in ["params", "cms", "waf"] {
            let cli = Cli::try_parse_from(["recon", name, "example.com", "-f", "json"]).unwrap();
            assert_eq!(
                cli.command.output_args().and_then(|a| a.format),
                Some(OutputFormat::Json),
                "{name}"
            );
        }

        assert!(Cli::try_parse_from(["recon", "secrets"]).is_err());
        let cli = Cli::try_parse_from(["recon", "secrets", "https://github.com/acme/app"]).unwrap();
        assert!(matches!(cli.command, Commands::Secrets { .. }));
    }

    #[test]
    fn test_merge_requires_reports_and_output() {
        assert!(Cli::try_parse_from(["recon", "merge", "--output", "m.json"]).is_err());
        assert!(Cli::try_parse_from(["recon", "merge", "a.json"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["recon", "-v", "-q", "tools"]).is_err());
    }

    #[test]
    fn test_output_args_lookup() {
        let cli = Cli::try_parse_from(["recon", "config", "path"]).unwrap();
        assert!(cli.command.output_args().is_none());

        let cli = Cli::try_parse_from(["recon", "tools", "--format", "text"]).unwrap();
        assert_eq!(
            cli.command.output_args().and_then(|a| a.format),
            Some(OutputFormat::Text)
        );
    }
}
