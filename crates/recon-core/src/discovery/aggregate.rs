//! Merging record and secret sequences from multiple sources.
//!
//! Sources are merged in the order they are passed in. Records keep their
//! first occurrence; secrets are concatenated as-is because the same token
//! reported by two tools may come with different context.
//!
//! ```rust
//! use recon_core::{Record, discovery::merge};
//!
//! let gau = vec![Record::new("https://example.com/a.js")];
//! let crawl = vec![
//!     Record::new("https://example.com/a.js"),
//!     Record::new("https://example.com/b"),
//! ];
//!
//! let merged = merge([gau, crawl]);
//! assert_eq!(merged.len(), 2);
//! assert_eq!(merged[1].url, "https://example.com/b");
//! ```

use std::collections::HashSet;

use crate::{Category, Record, Secret};

/// Merge record sequences, keeping the first occurrence of each
/// `(url, category)` pair in concatenation order.
#[must_use]
pub fn merge<I, S>(sequences: I) -> Vec<Record>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = Record>,
{
    let mut seen: HashSet<(String, Category)> = HashSet::new();
    let mut merged = Vec::new();

    for record in sequences.into_iter().flatten() {
        if seen.insert((record.url.clone(), record.category)) {
            merged.push(record);
        }
    }

    merged
}

/// Concatenate secret sequences in order, without deduplication.
#[must_use]
pub fn merge_secrets<I, S>(sequences: I) -> Vec<Secret>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = Secret>,
{
    sequences.into_iter().flatten().collect()
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
    use crate::discovery::normalize;
    use proptest::prelude::*;

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let a = vec![Record::new("https://example.com/2"), Record::new("https://example.com/1")];
        let b = vec![Record::new("https://example.com/1"), Record::new("https://example.com/3")];

        let urls: Vec<_> = merge([a, b]).into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/2",
                "https://example.com/1",
                "https://example.com/3"
            ]
        );
    }

    #[test]
    fn test_merge_empty() {
        let empty: Vec<Vec<Record>> = Vec::new();
        assert!(merge(empty).is_empty());
        assert!(merge([Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn test_relative_and_absolute_collapse_to_one_record() {
        let domain = "example.com";
        let tool_a: Vec<Record> = ["/a.js"]
            .iter()
            .filter_map(|raw| normalize(raw, domain))
            .map(Record::new)
            .collect();
        let tool_b: Vec<Record> = ["https://example.com/a.js"]
            .iter()
            .filter_map(|raw| normalize(raw, domain))
            .map(Record::new)
            .collect();

        let merged = merge([tool_a, tool_b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].url, "https://example.com/a.js");
        assert_eq!(merged[0].category, Category::Javascript);
    }

    #[test]
    fn test_merge_secrets_keeps_duplicates() {
        let a = vec!["api_key: 123".to_string()];
        let b = vec!["api_key: 123".to_string(), "token".to_string()];
        let merged = merge_secrets([a, b]);
        assert_eq!(merged, vec!["api_key: 123", "api_key: 123", "token"]);
    }

    fn arb_sequences() -> impl Strategy<Value = Vec<Vec<Record>>> {
        let record = "[a-c]{1,2}(\\.js|\\.css)?".prop_map(|path| {
            Record::new(format!("https://example.com/{path}"))
        });
        prop::collection::vec(prop::collection::vec(record, 0..8), 0..5)
    }

    proptest! {
        #[test]
        fn test_merge_has_no_duplicates(sequences in arb_sequences()) {
            let merged = merge(sequences);
            let mut seen = HashSet::new();
            for record in &merged {
                prop_assert!(seen.insert((record.url.clone(), record.category)));
            }
        }

        #[test]
        fn test_merge_preserves_first_seen_order(sequences in arb_sequences()) {
            let flat: Vec<Record> = sequences.iter().flatten().cloned().collect();
            let merged = merge(sequences);

            let mut expected = Vec::new();
            for record in flat {
                if !expected.contains(&record) {
                    expected.push(record);
                }
            }
            prop_assert_eq!(merged, expected);
        }
    }
}
