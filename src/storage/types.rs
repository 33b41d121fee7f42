//! Storage types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One stored page artifact, as enumerated by a backend listing.
#[derive(Debug, Clone, Serialize)]
pub struct PageObject {
    /// Full storage key, e.g. `documents/<id>/pages/3.png`
    pub key: String,
    /// Publicly resolvable URL for the artifact
    pub url: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Parse the 1-based page index out of a key's trailing segment.
///
/// `documents/<id>/pages/12.png` yields `12`. Keys whose trailing segment is
/// not numeric yield `None`.
pub fn page_index_from_key(key: &str) -> Option<u32> {
    let name = key.rsplit('/').next()?;
    let stem = name.strip_suffix(".png").unwrap_or(name);
    stem.parse().ok()
}

/// Ordering key for page artifacts: numeric page index when the key carries
/// one, raw key string otherwise. Numeric keys sort before raw keys, so a
/// stray unparseable artifact cannot break the page sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PageSortKey {
    Index(u32),
    Raw(String),
}

impl PageSortKey {
    fn from_key(key: &str) -> Self {
        match page_index_from_key(key) {
            Some(index) => PageSortKey::Index(index),
            None => PageSortKey::Raw(key.to_string()),
        }
    }
}

/// Sort page artifacts into page order, regardless of listing order.
///
/// Neither filesystem nor object-store listings guarantee an order, so the
/// sequence is always reconstructed from the index encoded in each key.
pub fn sort_pages(pages: &mut [PageObject]) {
    pages.sort_by_key(|page| PageSortKey::from_key(&page.key));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(key: &str) -> PageObject {
        PageObject {
            key: key.to_string(),
            url: format!("http://localhost/{}", key),
            size: 0,
            last_modified: None,
        }
    }

    #[test]
    fn parses_index_from_nested_key() {
        assert_eq!(page_index_from_key("documents/abc/pages/12.png"), Some(12));
        assert_eq!(page_index_from_key("abc/pages/1.png"), Some(1));
        assert_eq!(page_index_from_key("7.png"), Some(7));
    }

    #[test]
    fn non_numeric_trailing_segment_yields_none() {
        assert_eq!(page_index_from_key("documents/abc/pages/cover.png"), None);
        assert_eq!(page_index_from_key("documents/abc/pages/"), None);
    }

    #[test]
    fn sorts_numerically_not_lexically() {
        let mut pages = vec![
            page("d/pages/10.png"),
            page("d/pages/2.png"),
            page("d/pages/1.png"),
        ];
        sort_pages(&mut pages);
        let keys: Vec<&str> = pages.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["d/pages/1.png", "d/pages/2.png", "d/pages/10.png"]);
    }

    #[test]
    fn order_is_invariant_to_listing_order() {
        let mut a = vec![page("d/pages/3.png"), page("d/pages/1.png"), page("d/pages/2.png")];
        let mut b = vec![page("d/pages/2.png"), page("d/pages/3.png"), page("d/pages/1.png")];
        sort_pages(&mut a);
        sort_pages(&mut b);
        let keys_a: Vec<&str> = a.iter().map(|p| p.key.as_str()).collect();
        let keys_b: Vec<&str> = b.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys_a, keys_b);
    }

    #[test]
    fn unparseable_keys_fall_back_to_string_order_without_panicking() {
        let mut pages = vec![
            page("d/pages/cover.png"),
            page("d/pages/2.png"),
            page("d/pages/appendix.png"),
            page("d/pages/1.png"),
        ];
        sort_pages(&mut pages);
        let keys: Vec<&str> = pages.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "d/pages/1.png",
                "d/pages/2.png",
                "d/pages/appendix.png",
                "d/pages/cover.png",
            ]
        );
    }
}
