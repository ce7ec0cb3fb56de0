// src/utils/text.rs

//! Text cleanup helpers shared by the extractors.

use scraper::ElementRef;

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with normalized whitespace.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Remove a leading word (case-insensitive) followed by whitespace.
///
/// `"di Mario Rossi"` loses its `di`, while `"Diego Rossi"` is left alone.
pub fn strip_leading_word<'a>(text: &'a str, word: &str) -> &'a str {
    let Some(head) = text.get(..word.len()) else {
        return text;
    };
    if head.to_lowercase() != word.to_lowercase() {
        return text;
    }
    let rest = &text[word.len()..];
    match rest.chars().next() {
        Some(c) if c.is_whitespace() => rest.trim_start(),
        _ => text,
    }
}
