// src/models/selectors.rs

//! Element matchers used to locate markers inside catalog markup.
//!
//! A matcher is a CSS selector, optionally narrowed by a partial class
//! filter:
//!
//! - `css`: any selector `scraper` understands (`div.cc-product-list-item`,
//!   `a[href]`, `#description`). Parsed once, when the matcher is built.
//! - `class_contains`: one token of the element's class list *contains* the
//!   value as a substring. Detail pages decorate their text blocks with state
//!   modifiers (`cc-content-text--open`, `cc-content-text-collapsed`, ...),
//!   which exact class selectors cannot express.
//!
//! In TOML a matcher is either a bare selector string or a table:
//!
//! ```toml
//! card = "div.cc-product-list-item"
//! text = { css = "div", class_contains = "cc-content-text" }
//! ```

use std::fmt;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A parsed CSS selector with an optional partial class filter.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "MatcherDef", into = "MatcherDef")]
pub struct ElementMatcher {
    css: String,
    class_contains: Option<String>,
    selector: Selector,
}

/// Serialized form of [`ElementMatcher`].
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MatcherDef {
    Css(String),
    Table {
        css: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class_contains: Option<String>,
    },
}

impl TryFrom<MatcherDef> for ElementMatcher {
    type Error = AppError;

    fn try_from(def: MatcherDef) -> Result<Self> {
        match def {
            MatcherDef::Css(css) => Self::parse(&css),
            MatcherDef::Table {
                css,
                class_contains,
            } => {
                let mut matcher = Self::parse(&css)?;
                matcher.class_contains = class_contains;
                Ok(matcher)
            }
        }
    }
}

impl From<ElementMatcher> for MatcherDef {
    fn from(matcher: ElementMatcher) -> Self {
        match matcher.class_contains {
            None => Self::Css(matcher.css),
            Some(fragment) => Self::Table {
                css: matcher.css,
                class_contains: Some(fragment),
            },
        }
    }
}

impl ElementMatcher {
    /// Parse a CSS selector.
    pub fn parse(css: &str) -> Result<Self> {
        let selector =
            Selector::parse(css).map_err(|e| AppError::selector(css, format!("{e:?}")))?;
        Ok(Self {
            css: css.to_string(),
            class_contains: None,
            selector,
        })
    }

    /// Additionally require some class token to contain `fragment`.
    pub fn with_class_containing(mut self, fragment: impl Into<String>) -> Self {
        self.class_contains = Some(fragment.into());
        self
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn class_contains(&self) -> Option<&str> {
        self.class_contains.as_deref()
    }

    /// Reject a partial class filter that can never match.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.class_contains.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(AppError::selector(name, "class_contains is empty"));
        }
        Ok(())
    }

    /// Whether `element` matches the selector and the class filter.
    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.selector.matches(element)
            && self
                .class_contains
                .as_deref()
                .is_none_or(|fragment| class_list_contains(element.value().classes(), fragment))
    }

    /// First matching descendant of `scope`, in document order.
    /// The scope element itself is never returned.
    pub fn find_first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.find_all(scope).next()
    }

    /// All matching descendants of `scope`, in document order.
    pub fn find_all<'a>(&self, scope: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
        scope
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(move |el| self.matches(el))
    }

    /// First match anywhere in a parsed document.
    pub fn find_in_document<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.find_first(document.root_element())
    }
}

impl fmt::Debug for ElementMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class_contains {
            Some(fragment) => write!(f, "{} (class contains {:?})", self.css, fragment),
            None => f.write_str(&self.css),
        }
    }
}

impl PartialEq for ElementMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.css == other.css && self.class_contains == other.class_contains
    }
}

impl Eq for ElementMatcher {}

/// Partial class-name containment: true when some token of `classes`
/// contains `fragment`. An empty fragment never matches.
pub fn class_list_contains<'a>(mut classes: impl Iterator<Item = &'a str>, fragment: &str) -> bool {
    !fragment.is_empty() && classes.any(|token| token.contains(fragment))
}
