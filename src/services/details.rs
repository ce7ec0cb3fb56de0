// src/services/details.rs

//! Synopsis extraction from book detail pages.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::models::DetailSelectors;
use crate::utils::text::{element_text, normalize_whitespace};

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

/// Extracts the synopsis text of a detail page.
///
/// Lookup order, first hit wins:
/// 1. text block inside the primary body container; when the block holds
///    line breaks, only the segment after the last one is kept (the page
///    repeats the title above the synopsis),
/// 2. the same text block without line breaks, taken whole,
/// 3. text block inside the secondary container, taken whole,
/// 4. empty string.
#[derive(Debug, Clone, Default)]
pub struct DetailExtractor {
    selectors: DetailSelectors,
}

impl DetailExtractor {
    pub fn new(selectors: DetailSelectors) -> Self {
        Self { selectors }
    }

    /// Extract the synopsis from a full detail document. Never fails.
    pub fn extract(&self, detail_markup: &str) -> String {
        let document = Html::parse_document(detail_markup);
        let root = document.root_element();

        if let Some(text) = self.primary(root) {
            return text;
        }
        self.secondary(root).unwrap_or_default()
    }

    fn primary(&self, root: ElementRef<'_>) -> Option<String> {
        let body = self.selectors.body.find_first(root)?;
        let block = self.selectors.text.find_first(body)?;

        let inner = block.inner_html();
        if LINE_BREAK.is_match(&inner) {
            let last = LINE_BREAK.split(&inner).last().unwrap_or_default();
            Some(markup_text(last))
        } else {
            Some(element_text(block))
        }
    }

    fn secondary(&self, root: ElementRef<'_>) -> Option<String> {
        let container = self.selectors.secondary.find_first(root)?;
        let block = self.selectors.text.find_first(container)?;
        Some(element_text(block))
    }
}

/// Visible text of a markup snippet.
fn markup_text(snippet: &str) -> String {
    let fragment = Html::parse_fragment(snippet);
    normalize_whitespace(&fragment.root_element().text().collect::<Vec<_>>().join(" "))
}
