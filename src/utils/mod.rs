//! Utility functions and helpers.

pub mod text;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Whether a link attribute points at another document.
///
/// Blank values, fragment-only anchors and `javascript:` handlers do not.
pub fn is_resolvable_href(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty()
        && !href.starts_with('#')
        && !href.to_ascii_lowercase().starts_with("javascript:")
}

/// Resolve a link attribute, treating unresolvable values as absent.
pub fn resolve_link(base: &Url, href: Option<&str>) -> Option<String> {
    href.filter(|h| is_resolvable_href(h))
        .map(|h| resolve_url(base, h.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.ibs.it").unwrap();
        assert_eq!(
            resolve_url(&base, "/storia-d-italia/e/9788858155"),
            "https://www.ibs.it/storia-d-italia/e/9788858155"
        );
        assert_eq!(
            resolve_url(&base, "https://img.ibs.it/cover.jpg"),
            "https://img.ibs.it/cover.jpg"
        );
    }

    #[test]
    fn test_resolve_link_blank_is_absent() {
        let base = Url::parse("https://www.ibs.it").unwrap();
        assert_eq!(resolve_link(&base, None), None);
        assert_eq!(resolve_link(&base, Some("   ")), None);
        assert_eq!(resolve_link(&base, Some("#top")), None);
        assert_eq!(resolve_link(&base, Some("javascript:void(0)")), None);
        assert_eq!(
            resolve_link(&base, Some(" /a ")),
            Some("https://www.ibs.it/a".to_string())
        );
    }

    #[test]
    fn test_is_resolvable_href() {
        assert!(is_resolvable_href("/libro/e/1"));
        assert!(is_resolvable_href("https://www.ibs.it/a"));
        assert!(!is_resolvable_href(""));
        assert!(!is_resolvable_href("#"));
        assert!(!is_resolvable_href(" #reviews"));
        assert!(!is_resolvable_href("JavaScript:open()"));
    }
}
