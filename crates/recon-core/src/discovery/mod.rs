//! URL normalization, classification and merging for discovery results.
//!
//! ## Quick Start
//!
//! ```rust
//! use recon_core::discovery::{classify, merge, normalize};
//! use recon_core::{Category, Record};
//!
//! let domain = "example.com";
//! let from_crawler: Vec<Record> = ["/static/app.js", "https://other.org/x"]
//!     .iter()
//!     .filter_map(|raw| normalize(raw, domain))
//!     .map(Record::new)
//!     .collect();
//!
//! assert_eq!(from_crawler.len(), 1);
//! assert_eq!(classify(&from_crawler[0].url), Category::Javascript);
//!
//! let merged = merge([from_crawler.clone(), from_crawler]);
//! assert_eq!(merged.len(), 1);
//! ```

pub mod aggregate;
pub mod classify;
pub mod normalize;

pub use aggregate::{merge, merge_secrets};
pub use classify::classify;
pub use normalize::{extract_domain, in_scope, is_absolute, normalize, strip_scheme};
