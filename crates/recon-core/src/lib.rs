//! # recon-core
//!
//! Core functionality for reconkit - a multi-source reconnaissance result
//! aggregator.
//!
//! External tools (gau, gospider, hakrawler, waybackurls, JSRecon,
//! linkfinder, SecretFinder, ffuf, subfinder, httpx, whois, naabu) are run
//! as black boxes. This crate turns their raw output into normalized,
//! classified, deduplicated results and writes them as per-domain JSON
//! reports.
//!
//! Scanner wrappers sit next to discovery: nmap deepens a port scan,
//! trufflehog looks for leaked secrets in repositories, nuclei and nikto
//! report vulnerabilities, arjun and x8 find HTTP parameters, and wpscan
//! and wafw00f fingerprint WordPress and web application firewalls.
//!
//! ## Architecture
//!
//! - **Discovery**: URL normalization, content-type classification and
//!   order-preserving merging
//! - **Adapters**: one translator per tool output format
//! - **Liveness**: alive / dead / check bucketing of httpx results
//! - **Tools**: locating and running the external binaries with timeouts
//! - **Pipelines**: concurrent tool runs joined before merging
//! - **Reports**: atomic JSON persistence
//!
//! ## Quick Start
//!
//! ```rust
//! use recon_core::adapters::{SourceAdapter, GauAdapter, HakrawlerAdapter};
//! use recon_core::discovery::merge;
//! use recon_core::Category;
//!
//! let gau = GauAdapter.adapt(&[r#"{"url":"/a.js"}"#.to_string()], "example.com");
//! let crawl = HakrawlerAdapter.adapt(
//!     &[r#"{"URL":"https://example.com/a.js"}"#.to_string()],
//!     "example.com",
//! );
//!
//! let merged = merge([gau.records, crawl.records]);
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].category, Category::Javascript);
//! ```
//!
//! ## Error Handling
//!
//! Tool problems never abort a pipeline; they are logged and the tool
//! contributes nothing. Operations that can fail return
//! [`Result<T, Error>`]:
//!
//! ```rust
//! use recon_core::{Error, ReportWriter};
//! use std::path::Path;
//!
//! match ReportWriter::read(Path::new("missing.json")) {
//!     Ok(report) => println!("{} urls", report.url_count()),
//!     Err(Error::NotFound(what)) => eprintln!("no such {what}"),
//!     Err(e) => eprintln!("{} error: {e}", e.category()),
//! }
//! ```

/// Per-tool output translation
pub mod adapters;
/// Configuration for tools, timeouts and output paths
pub mod config;
/// URL normalization, classification and merging
pub mod discovery;
/// Error types and result aliases
pub mod error;
/// Alive / dead / check bucketing
pub mod liveness;
/// Concurrent end-to-end workflows
pub mod pipeline;
/// JSON report persistence
pub mod report;
/// External tool detection and execution
pub mod tools;
/// Core data types
pub mod types;
/// WHOIS output parsing
pub mod whois;

// Re-export commonly used types
pub use config::{Config, DefaultsConfig, HttpxConfig, PathsConfig, ToolSettings, WordlistsConfig};
pub use error::{Error, Result};
pub use liveness::{Liveness, LivenessBuckets, classify_liveness};
pub use report::{Report, ReportWriter, merge_reports};
pub use tools::{Tool, ToolRunner};
pub use types::*;
