//! Turning httpx results into alive / dead / check buckets.
//!
//! ```rust
//! use recon_core::adapters::HttpResult;
//! use recon_core::liveness::{enrich, partition};
//!
//! let results = vec![
//!     HttpResult { url: "https://www.example.com".into(), status_code: Some(200), ..HttpResult::default() },
//!     HttpResult { url: "http://old.example.com".into(), status_code: Some(301), ..HttpResult::default() },
//!     HttpResult::failed("http://gone.example.com"),
//! ];
//!
//! let buckets = partition(enrich(results));
//! assert_eq!(buckets.alive.len(), 1);
//! assert_eq!(buckets.check.len(), 1);
//! assert_eq!(buckets.dead[0].id, 3);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::adapters::HttpResult;
use crate::{EnrichedHost, Protocol};

/// Bucket a checked host belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    /// Answered with 200 or 403.
    Alive,
    /// No response, or 404.
    Dead,
    /// Answered with anything else; worth a manual look.
    Check,
}

/// Classify an HTTP status code.
///
/// 403 counts as alive: something is there, it just refuses us.
#[must_use]
pub const fn classify_liveness(status_code: Option<u16>) -> Liveness {
    match status_code {
        None | Some(404) => Liveness::Dead,
        Some(200 | 403) => Liveness::Alive,
        Some(_) => Liveness::Check,
    }
}

/// Hosts split by [`Liveness`], each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessBuckets {
    /// 200 / 403
    pub alive: Vec<EnrichedHost>,
    /// no status / 404
    pub dead: Vec<EnrichedHost>,
    /// everything else
    pub check: Vec<EnrichedHost>,
}

impl LivenessBuckets {
    /// Total number of hosts across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.len() + self.dead.len() + self.check.len()
    }

    /// Whether all buckets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split hosts into liveness buckets.
#[must_use]
pub fn partition<I>(hosts: I) -> LivenessBuckets
where
    I: IntoIterator<Item = EnrichedHost>,
{
    let mut buckets = LivenessBuckets::default();
    for host in hosts {
        match classify_liveness(host.status_code) {
            Liveness::Alive => buckets.alive.push(host),
            Liveness::Dead => buckets.dead.push(host),
            Liveness::Check => buckets.check.push(host),
        }
    }
    buckets
}

/// Number results 1..=n and split their URLs into protocol and domain.
///
/// Results whose URL has no `://` or a scheme other than http/https are
/// dropped and do not consume an id.
#[must_use]
pub fn enrich<I>(results: I) -> Vec<EnrichedHost>
where
    I: IntoIterator<Item = HttpResult>,
{
    let mut next_id: u32 = 1;
    let mut hosts = Vec::new();

    for result in results {
        let Some((scheme, domain)) = result.url.split_once("://") else {
            trace!(url = %result.url, "result url has no scheme");
            continue;
        };
        let Some(protocol) = Protocol::from_scheme(scheme) else {
            trace!(url = %result.url, "result url has unsupported scheme");
            continue;
        };

        hosts.push(EnrichedHost {
            id: next_id,
            domain: domain.to_string(),
            protocol,
            url: result.url.clone(),
            status_code: result.status_code,
            tls_version: result.tls_version,
            content_length: result.content_length,
            title: result.title,
            server: result.server,
            cdn: result.cdn,
        });
        next_id += 1;
    }

    hosts
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

    fn host(id: u32, status_code: Option<u16>) -> EnrichedHost {
        EnrichedHost {
            id,
            domain: format!("h{id}.example.com"),
            protocol: Protocol::Https,
            url: format!("https://h{id}.example.com"),
            status_code,
            tls_version: None,
            content_length: None,
            title: None,
            server: None,
            cdn: None,
        }
    }

    #[test]
    fn test_boundary_codes() {
        assert_eq!(classify_liveness(Some(404)), Liveness::Dead);
        assert_eq!(classify_liveness(None), Liveness::Dead);
        assert_eq!(classify_liveness(Some(200)), Liveness::Alive);
        assert_eq!(classify_liveness(Some(403)), Liveness::Alive);
        assert_eq!(classify_liveness(Some(301)), Liveness::Check);
        assert_eq!(classify_liveness(Some(500)), Liveness::Check);
        assert_eq!(classify_liveness(Some(201)), Liveness::Check);
    }

    #[test]
    fn test_partition_keeps_order_within_buckets() {
        let buckets = partition(vec![
            host(1, Some(200)),
            host(2, Some(404)),
            host(3, Some(403)),
            host(4, Some(302)),
            host(5, None),
        ]);

        let ids = |hosts: &[EnrichedHost]| hosts.iter().map(|h| h.id).collect::<Vec<_>>();
        assert_eq!(ids(&buckets.alive), vec![1, 3]);
        assert_eq!(ids(&buckets.dead), vec![2, 5]);
        assert_eq!(ids(&buckets.check), vec![4]);
        assert_eq!(buckets.len(), 5);
    }

    #[test]
    fn test_enrich_assigns_sequential_ids() {
        let hosts = enrich(vec![
            HttpResult {
                url: "https://api.example.com".into(),
                status_code: Some(200),
                tls_version: Some("tls12".into()),
                ..HttpResult::default()
            },
            HttpResult::failed("ftp://files.example.com"),
            HttpResult::failed("no-scheme.example.com"),
            HttpResult::failed("http://down.example.com"),
        ]);

        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].id, 1);
        assert_eq!(hosts[0].domain, "api.example.com");
        assert_eq!(hosts[0].protocol, Protocol::Https);
        assert_eq!(hosts[0].tls_version.as_deref(), Some("tls12"));
        assert_eq!(hosts[1].id, 2);
        assert_eq!(hosts[1].protocol, Protocol::Http);
        assert_eq!(hosts[1].status_code, None);
    }

    #[test]
    fn test_enrich_empty() {
        assert!(enrich(Vec::new()).is_empty());
        assert!(partition(Vec::new()).is_empty());
    }

    proptest! {
        #[test]
        fn test_partition_is_complete_and_disjoint(
            codes in prop::collection::vec(prop::option::of(100u16..600), 0..50)
        ) {
            let hosts: Vec<EnrichedHost> = codes
                .iter()
                .zip(1u32..)
                .map(|(code, id)| host(id, *code))
                .collect();
            let buckets = partition(hosts.clone());

            prop_assert_eq!(buckets.len(), hosts.len());

            let mut ids: Vec<u32> = buckets
                .alive
                .iter()
                .chain(&buckets.dead)
                .chain(&buckets.check)
                .map(|h| h.id)
                .collect();
            ids.sort_unstable();
            let expected: Vec<u32> = hosts.iter().map(|h| h.id).collect();
            prop_assert_eq!(ids, expected);

            for h in &buckets.alive {
                prop_assert_eq!(classify_liveness(h.status_code), Liveness::Alive);
            }
            for h in &buckets.dead {
                prop_assert_eq!(classify_liveness(h.status_code), Liveness::Dead);
            }
        }
    }
}
