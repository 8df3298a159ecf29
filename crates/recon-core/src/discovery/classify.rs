//! Content-type classification by path suffix.
//!
//! ```rust
//! use recon_core::{Category, discovery::classify};
//!
//! assert_eq!(classify("https://example.com/app.js"), Category::Javascript);
//! assert_eq!(classify("https://example.com/login.php"), Category::ServerScript);
//! assert_eq!(classify("https://example.com/about"), Category::Link);
//! ```

use crate::Category;

/// Suffix table in precedence order; the first matching row wins.
const SUFFIX_RULES: &[(&[&str], Category)] = &[
    (&[".js", ".jsx"], Category::Javascript),
    (&[".css", ".scss", ".less"], Category::Css),
    (&[".json"], Category::Json),
    (&[".txt", ".text", ".log"], Category::Txt),
    (
        &[".jpg", ".jpeg", ".png", ".gif", ".svg", ".ico", ".webp"],
        Category::Image,
    ),
    (
        &[".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx"],
        Category::Document,
    ),
    (&[".xml", ".rss", ".atom"], Category::Xml),
    (&[".php", ".asp", ".aspx", ".jsp"], Category::ServerScript),
    (&[".html", ".htm"], Category::Html),
];

/// Classify a URL by the suffix of its path.
///
/// Case-sensitive: `APP.JS` is a [`Category::Link`]. The query string and
/// fragment are ignored, so `app.js?v=3` is still JavaScript.
#[must_use]
pub fn classify(url: &str) -> Category {
    let path = path_part(url);
    SUFFIX_RULES
        .iter()
        .find(|(suffixes, _)| suffixes.iter().any(|suffix| path.ends_with(suffix)))
        .map_or(Category::Link, |(_, category)| *category)
}

fn path_part(url: &str) -> &str {
    url.find(['?', '#']).map_or(url, |idx| &url[..idx])
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
    fn test_every_suffix_maps_to_its_category() {
        let cases = [
            ("a.js", Category::Javascript),
            ("a.jsx", Category::Javascript),
            ("a.css", Category::Css),
            ("a.scss", Category::Css),
            ("a.less", Category::Css),
            ("a.json", Category::Json),
            ("a.txt", Category::Txt),
            ("a.text", Category::Txt),
            ("a.log", Category::Txt),
            ("a.jpg", Category::Image),
            ("a.jpeg", Category::Image),
            ("a.png", Category::Image),
            ("a.gif", Category::Image),
            ("a.svg", Category::Image),
            ("a.ico", Category::Image),
            ("a.webp", Category::Image),
            ("a.pdf", Category::Document),
            ("a.doc", Category::Document),
            ("a.docx", Category::Document),
            ("a.xls", Category::Document),
            ("a.xlsx", Category::Document),
            ("a.ppt", Category::Document),
            ("a.pptx", Category::Document),
            ("a.xml", Category::Xml),
            ("a.rss", Category::Xml),
            ("a.atom", Category::Xml),
            ("a.php", Category::ServerScript),
            ("a.asp", Category::ServerScript),
            ("a.aspx", Category::ServerScript),
            ("a.jsp", Category::ServerScript),
            ("a.html", Category::Html),
            ("a.htm", Category::Html),
        ];

        for (file, expected) in cases {
            let url = format!("https://example.com/{file}");
            assert_eq!(classify(&url), expected, "{url}");
        }
    }

    #[test]
    fn test_unknown_is_link() {
        assert_eq!(classify("https://example.com/"), Category::Link);
        assert_eq!(classify("https://example.com/api/v1/users"), Category::Link);
        assert_eq!(classify("https://example.com/archive.tar.gz"), Category::Link);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(classify("https://example.com/APP.JS"), Category::Link);
        assert_eq!(classify("https://example.com/Index.HTML"), Category::Link);
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(
            classify("https://example.com/app.js?v=3"),
            Category::Javascript
        );
        assert_eq!(classify("https://example.com/page.html#top"), Category::Html);
        assert_eq!(classify("https://example.com/?file=x.js"), Category::Link);
    }

    #[test]
    fn test_precedence_first_match_wins() {
        // `.json` does not end with `.js`, but `.jsp` must not be read as JavaScript.
        assert_eq!(classify("https://example.com/a.json"), Category::Json);
        assert_eq!(classify("https://example.com/a.jsp"), Category::ServerScript);
    }

    proptest! {
        #[test]
        fn test_classify_is_idempotent(url in ".{0,60}") {
            prop_assert_eq!(classify(&url), classify(&url));
        }
    }
}
