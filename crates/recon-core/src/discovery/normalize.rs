//! URL normalization and domain scoping.
//!
//! Tools report URLs in every shape: absolute, root-relative (`/api`),
//! dot-relative (`./app.js`) and bare (`static/x.css`). [`normalize`] turns
//! all of them into absolute `https://` URLs for the target domain and drops
//! absolute URLs that do not mention the domain.
//!
//! ```rust
//! use recon_core::discovery::normalize;
//!
//! assert_eq!(
//!     normalize("/path", "example.com").as_deref(),
//!     Some("https://example.com/path"),
//! );
//! assert_eq!(normalize("https://evil.com/x", "example.com"), None);
//! ```
//!
//! The scope check is a plain substring test, not a host comparison:
//! `https://example.com.evil.net/` is accepted for `example.com`.

use url::Url;

/// Normalize a raw URL string against `domain`.
///
/// Returns `None` for empty input and for absolute URLs outside the domain
/// scope (see [`in_scope`]). Relative forms are always accepted.
#[must_use]
pub fn normalize(raw: &str, domain: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if is_absolute(raw) {
        return in_scope(raw, domain).then(|| raw.to_string());
    }

    if raw.starts_with('/') {
        return Some(format!("https://{domain}{raw}"));
    }

    let rest = raw.strip_prefix("./").unwrap_or(raw);
    Some(format!("https://{domain}/{rest}"))
}

/// Whether `url` belongs to the scan scope of `domain`.
///
/// Substring match, so parent and sibling hosts that embed the domain
/// string pass as well.
#[must_use]
pub fn in_scope(url: &str, domain: &str) -> bool {
    url.contains(domain)
}

/// Whether `raw` starts with an `http://` or `https://` scheme.
#[must_use]
pub fn is_absolute(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

/// Strip scheme and slashes from a tool's `input` field to get a bare host.
///
/// `https://example.com/` becomes `example.com`.
#[must_use]
pub fn strip_scheme(input: &str) -> &str {
    let input = input.trim();
    let input = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);
    input.trim_matches('/')
}

/// Extract the host from a user-supplied target.
///
/// Accepts bare domains (`example.com`), URLs (`https://example.com/x`) and
/// host:port pairs. Returns `None` when nothing host-like remains.
///
/// ```rust
/// use recon_core::discovery::extract_domain;
///
/// assert_eq!(extract_domain("https://Example.com/login").as_deref(), Some("example.com"));
/// assert_eq!(extract_domain("example.com").as_deref(), Some("example.com"));
/// assert_eq!(extract_domain("   "), None);
/// ```
#[must_use]
pub fn extract_domain(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    let host = Url::parse(&candidate).ok()?.host_str()?.to_string();
    if host.is_empty() { None } else { Some(host) }
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

    #[test]
    fn test_absolute_in_scope_is_kept_verbatim() {
        assert_eq!(
            normalize("http://example.com/a?b=1", "example.com").as_deref(),
            Some("http://example.com/a?b=1")
        );
        assert_eq!(
            normalize("https://cdn.example.com/x.js", "example.com").as_deref(),
            Some("https://cdn.example.com/x.js")
        );
    }

    #[test]
    fn test_absolute_out_of_scope_is_rejected() {
        assert_eq!(normalize("https://evil.com/x", "example.com"), None);
        assert_eq!(normalize("http://other.org/", "example.com"), None);
    }

    #[test]
    fn test_loose_substring_scope_is_preserved() {
        assert_eq!(
            normalize("https://example.com.evil.com/x", "example.com").as_deref(),
            Some("https://example.com.evil.com/x")
        );
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(
            normalize("/path", "example.com").as_deref(),
            Some("https://example.com/path")
        );
    }

    #[test]
    fn test_dot_relative() {
        assert_eq!(
            normalize("./static/app.js", "example.com").as_deref(),
            Some("https://example.com/static/app.js")
        );
    }

    #[test]
    fn test_bare_relative() {
        assert_eq!(
            normalize("assets/site.css", "example.com").as_deref(),
            Some("https://example.com/assets/site.css")
        );
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert_eq!(normalize("", "example.com"), None);
        assert_eq!(normalize("   \t", "example.com"), None);
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("https://example.com/"), "example.com");
        assert_eq!(strip_scheme("http://example.com"), "example.com");
        assert_eq!(strip_scheme("example.com"), "example.com");
    }

    #[test]
    fn test_extract_domain_variants() {
        assert_eq!(
            extract_domain("http://sub.example.com:8080/x").as_deref(),
            Some("sub.example.com")
        );
        assert_eq!(
            extract_domain("example.com/path").as_deref(),
            Some("example.com")
        );
        assert_eq!(extract_domain(""), None);
    }

    proptest! {
        #[test]
        fn test_relative_paths_always_land_on_domain(path in "/[a-z0-9/._-]{0,30}") {
            let normalized = normalize(&path, "example.com").unwrap();
            prop_assert!(normalized.starts_with("https://example.com/"));
        }

        #[test]
        fn test_normalized_output_is_absolute(raw in "[a-z./]{1,20}") {
            if let Some(url) = normalize(&raw, "example.com") {
                prop_assert!(is_absolute(&url));
            }
        }
    }
}
