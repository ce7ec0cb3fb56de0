// src/services/cards.rs

//! Listing card extraction.
//!
//! Turns one product card of a category listing into a [`BookRecord`].
//! Every field has its own fallback so a missing marker only degrades that
//! field; a card without a usable title is skipped as a whole.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

use crate::models::{
    BookRecord, CategoryLabel, Description, ElementMatcher, ListingSelectors, UNKNOWN,
};
use crate::utils::{is_resolvable_href, resolve_link};
use crate::utils::text::{element_text, strip_leading_word};

/// Trailing year: four digits standing as their own word at the end.
static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}])(\d{4})$").expect("trailing year pattern is valid")
});

/// Minimum title length (in characters) for a card to be kept.
const MIN_TITLE_CHARS: usize = 2;

/// Extracts book records from listing markup.
#[derive(Debug, Clone)]
pub struct CardExtractor {
    selectors: ListingSelectors,
    base: Url,
}

impl CardExtractor {
    /// Create an extractor resolving links against `base`.
    pub fn new(selectors: ListingSelectors, base: Url) -> Self {
        Self { selectors, base }
    }

    /// Marker identifying a listing card.
    pub fn card_matcher(&self) -> &ElementMatcher {
        &self.selectors.card
    }

    /// Extract every card of a listing page, skipping unusable cards.
    pub fn extract_page(&self, html: &str) -> Vec<BookRecord> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for card in self.selectors.card.find_all(document.root_element()) {
            match self.extract_card(card) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!("Skipped {} card(s) without a usable title", skipped);
        }
        records
    }

    /// Extract a record from the markup of a single card.
    ///
    /// The markup may be the card element itself or a fragment containing it.
    pub fn extract(&self, card_markup: &str) -> Option<BookRecord> {
        let fragment = Html::parse_fragment(card_markup);
        let root = fragment.root_element();
        let card = self.selectors.card.find_first(root).unwrap_or(root);
        self.extract_card(card)
    }

    /// Extract a record from a parsed card element.
    pub fn extract_card(&self, card: ElementRef<'_>) -> Option<BookRecord> {
        let anchor = self.selectors.title.find_first(card).or_else(|| {
            self.selectors
                .title_fallback
                .find_all(card)
                .find(|a| a.value().attr("href").is_some_and(is_resolvable_href))
        })?;

        let title = element_text(anchor);
        if title.chars().count() < MIN_TITLE_CHARS {
            return None;
        }

        let link = resolve_link(&self.base, anchor.value().attr("href"));
        let (publisher, year) = self.publisher_and_year(card);

        Some(BookRecord {
            cover_url: self.cover(card),
            title,
            author: self.author(card),
            publisher,
            year,
            link,
            description: Description::NotAttempted,
            category_label: CategoryLabel::Other,
        })
    }

    fn cover(&self, card: ElementRef<'_>) -> Option<String> {
        let column = self.selectors.image_column.find_first(card)?;
        let image = self.selectors.image.find_first(column)?;
        let attrs = image.value();

        let src = attrs.attr("src").filter(|s| !s.trim().is_empty());
        resolve_link(&self.base, src.or_else(|| attrs.attr("data-src")))
    }

    fn author(&self, card: ElementRef<'_>) -> String {
        let Some(marker) = self.selectors.author.find_first(card) else {
            return UNKNOWN.to_string();
        };

        let raw = element_text(marker);
        let author = self
            .selectors
            .author_prefixes
            .iter()
            .fold(raw.as_str(), |text, prefix| strip_leading_word(text, prefix));

        if author.is_empty() {
            UNKNOWN.to_string()
        } else {
            author.to_string()
        }
    }

    fn publisher_and_year(&self, card: ElementRef<'_>) -> (String, String) {
        match self.selectors.publisher.find_first(card) {
            Some(marker) => split_publisher_year(&element_text(marker)),
            None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
        }
    }
}

/// Split a `"publisher, year"` text on its trailing four-digit token.
///
/// Without a trailing year the whole text is the publisher and the year is
/// [`UNKNOWN`]. Digits glued to the name (`"Edizioni1984"`) are not a year.
pub fn split_publisher_year(text: &str) -> (String, String) {
    let text = text.trim();
    let trim_tail = |s: &str| {
        s.trim_end_matches(|c: char| c == ',' || c.is_whitespace())
            .to_string()
    };

    let (publisher, year) = match TRAILING_YEAR.captures(text).and_then(|c| c.get(1)) {
        Some(year) => (trim_tail(&text[..year.start()]), year.as_str().to_string()),
        None => (trim_tail(text), UNKNOWN.to_string()),
    };

    let publisher = if publisher.is_empty() {
        UNKNOWN.to_string()
    } else {
        publisher
    };
    (publisher, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> CardExtractor {
        CardExtractor::new(
            ListingSelectors::default(),
            Url::parse("https://www.ibs.it").unwrap(),
        )
    }

    fn card(title: &str) -> String {
        format!(
            r#"<div class="cc-product-list-item">
                <div class="cc-col-img"><img src="https://img.ibs.it/cover.jpg" data-src="https://img.ibs.it/lazy.jpg"></div>
                <div class="cc-col-info">
                    <a class="title" href="/storia-d-italia/e/9788858155">{title}</a>
                    <div class="cc-author">di M. Rossi</div>
                    <div class="cc-publisher">Gius. Laterza &amp; Figli, 2024</div>
                </div>
            </div>"#
        )
    }

    #[test]
    fn test_extract_full_card() {
        let record = extractor().extract(&card("Storia d'Italia")).unwrap();
        assert_eq!(record.title, "Storia d'Italia");
        assert_eq!(record.author, "M. Rossi");
        assert_eq!(record.publisher, "Gius. Laterza & Figli");
        assert_eq!(record.year, "2024");
        assert_eq!(
            record.link.as_deref(),
            Some("https://www.ibs.it/storia-d-italia/e/9788858155")
        );
        assert_eq!(record.cover_url.as_deref(), Some("https://img.ibs.it/cover.jpg"));
        assert_eq!(record.description, Description::NotAttempted);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let markup = card("Storia d'Italia");
        let ex = extractor();
        assert_eq!(ex.extract(&markup), ex.extract(&markup));
    }

    #[test]
    fn test_single_char_title_is_discarded() {
        assert!(extractor().extract(&card("X")).is_none());
        assert!(extractor().extract(&card("  ")).is_none());
        assert!(extractor().extract(&card("Io")).is_some());
    }

    #[test]
    fn test_card_without_anchor_is_skipped() {
        let markup = r#"<div class="cc-product-list-item"><div class="cc-author">di A</div></div>"#;
        assert!(extractor().extract(markup).is_none());
    }

    #[test]
    fn test_title_falls_back_to_any_linked_anchor() {
        let markup = r#"<div class="cc-product-list-item">
            <a>Senza link</a>
            <a href="/saggio/e/1">Un saggio</a>
        </div>"#;
        let record = extractor().extract(markup).unwrap();
        assert_eq!(record.title, "Un saggio");
        assert_eq!(record.link.as_deref(), Some("https://www.ibs.it/saggio/e/1"));
    }

    #[test]
    fn test_fallback_skips_anchors_without_target() {
        let markup = r##"<div class="cc-product-list-item">
            <a href="">Vuoto</a>
            <a href="#recensioni">Recensioni</a>
            <a href="javascript:void(0)">Apri</a>
            <a href="/saggio/e/2">Il saggio</a>
        </div>"##;
        let record = extractor().extract(markup).unwrap();
        assert_eq!(record.title, "Il saggio");
        assert_eq!(record.link.as_deref(), Some("https://www.ibs.it/saggio/e/2"));
    }

    #[test]
    fn test_fallback_without_any_target_skips_card() {
        let markup = r##"<div class="cc-product-list-item"><a href="#">Senza destinazione</a></div>"##;
        assert!(extractor().extract(markup).is_none());
    }

    #[test]
    fn test_title_anchor_without_href_has_no_link() {
        let markup = r#"<div class="cc-product-list-item"><a class="title">Un saggio</a></div>"#;
        let record = extractor().extract(markup).unwrap();
        assert_eq!(record.link, None);
    }

    #[test]
    fn test_missing_markers_degrade_to_sentinels() {
        let markup = r#"<div class="cc-product-list-item"><a class="title" href="/a">Titolo</a></div>"#;
        let record = extractor().extract(markup).unwrap();
        assert_eq!(record.author, UNKNOWN);
        assert_eq!(record.publisher, UNKNOWN);
        assert_eq!(record.year, UNKNOWN);
        assert_eq!(record.cover_url, None);
    }

    #[test]
    fn test_cover_falls_back_to_lazy_source() {
        let markup = r#"<div class="cc-product-list-item">
            <div class="cc-col-img"><img src="" data-src="//img.ibs.it/lazy.jpg"></div>
            <a class="title" href="/a">Titolo</a>
        </div>"#;
        let record = extractor().extract(markup).unwrap();
        assert_eq!(record.cover_url.as_deref(), Some("https://img.ibs.it/lazy.jpg"));
    }

    #[test]
    fn test_image_outside_column_is_ignored() {
        let markup = r#"<div class="cc-product-list-item">
            <img src="https://img.ibs.it/badge.png">
            <a class="title" href="/a">Titolo</a>
        </div>"#;
        assert_eq!(extractor().extract(markup).unwrap().cover_url, None);
    }

    #[test]
    fn test_author_prefix_is_case_insensitive_word() {
        let markup = r#"<div class="cc-product-list-item">
            <a class="title" href="/a">Titolo</a><span class="cc-author">DI Diego Fusaro</span>
        </div>"#;
        assert_eq!(extractor().extract(markup).unwrap().author, "Diego Fusaro");

        let markup = r#"<div class="cc-product-list-item">
            <a class="title" href="/a">Titolo</a><span class="cc-author">Diego Fusaro</span>
        </div>"#;
        assert_eq!(extractor().extract(markup).unwrap().author, "Diego Fusaro");
    }

    #[test]
    fn test_extract_page_keeps_order_and_skips_bad_cards() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            card("Primo libro"),
            card("Z"),
            card("Terzo libro")
        );
        let records = extractor().extract_page(&html);
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Primo libro", "Terzo libro"]);
    }

    #[test]
    fn test_split_publisher_year() {
        assert_eq!(
            split_publisher_year("Gius. Laterza & Figli, 2024"),
            ("Gius. Laterza & Figli".to_string(), "2024".to_string())
        );
        assert_eq!(
            split_publisher_year("Einaudi 2023"),
            ("Einaudi".to_string(), "2023".to_string())
        );
        assert_eq!(
            split_publisher_year("Il Mulino,"),
            ("Il Mulino".to_string(), UNKNOWN.to_string())
        );
        assert_eq!(
            split_publisher_year("Edizioni1984"),
            ("Edizioni1984".to_string(), UNKNOWN.to_string())
        );
        assert_eq!(
            split_publisher_year("2025"),
            (UNKNOWN.to_string(), "2025".to_string())
        );
    }
}
