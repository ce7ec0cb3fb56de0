// src/models/book.rs

//! Book record data structures.

use serde::{Deserialize, Serialize};

/// Placeholder for an author or publisher that could not be resolved.
pub const UNKNOWN: &str = "N/D";

/// Description text exported when the detail page never loaded.
pub const TIMEOUT_DESCRIPTION: &str = "Errore caricamento pagina";

/// Description text exported when the record has no detail link.
pub const NO_LINK_DESCRIPTION: &str = UNKNOWN;

/// Whether a record's publisher is on the priority allow-list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryLabel {
    #[serde(rename = "Editori Selezionati")]
    Priority,
    #[default]
    #[serde(rename = "Altri Editori")]
    Other,
}

impl CategoryLabel {
    pub fn is_priority(self) -> bool {
        self == Self::Priority
    }
}

/// Synopsis state of a record. Each failure cause has its own variant so
/// "nothing was found" is never confused with "nothing was tried".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Description {
    /// Enrichment was not attempted (non-priority record, or phase skipped)
    #[default]
    NotAttempted,
    /// Detail page loaded and a synopsis was extracted
    Fetched(String),
    /// Detail page loaded but no synopsis container matched
    Empty,
    /// Detail page did not confirm loading within the wait
    Timeout,
    /// Record has no detail link
    NoLink,
    /// Any other failure while fetching the detail page
    Failed,
}

impl Description {
    /// Text handed to the display layer.
    pub fn text(&self) -> &str {
        match self {
            Self::Fetched(text) => text,
            Self::Timeout => TIMEOUT_DESCRIPTION,
            Self::NoLink => NO_LINK_DESCRIPTION,
            Self::NotAttempted | Self::Empty | Self::Failed => "",
        }
    }

    /// Stable machine-readable status name.
    pub fn status(&self) -> DescriptionStatus {
        match self {
            Self::NotAttempted => DescriptionStatus::NotAttempted,
            Self::Fetched(_) => DescriptionStatus::Fetched,
            Self::Empty => DescriptionStatus::Empty,
            Self::Timeout => DescriptionStatus::Timeout,
            Self::NoLink => DescriptionStatus::NoLink,
            Self::Failed => DescriptionStatus::Failed,
        }
    }

    /// Build from extracted text, mapping an empty extraction to `Empty`.
    pub fn from_extracted(text: String) -> Self {
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Fetched(text)
        }
    }
}

/// Serialized companion of [`Description`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionStatus {
    NotAttempted,
    Fetched,
    Empty,
    Timeout,
    NoLink,
    Failed,
}

/// One catalog entry extracted from a listing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    /// Absolute cover image URL
    pub cover_url: Option<String>,

    /// Book title, at least two characters
    pub title: String,

    /// Author with the leading preposition stripped, or [`UNKNOWN`]
    pub author: String,

    /// Publisher name, or [`UNKNOWN`]
    pub publisher: String,

    /// Publication year, or [`UNKNOWN`]
    pub year: String,

    /// Absolute detail page URL
    pub link: Option<String>,

    /// Synopsis state, filled by the detail enricher
    pub description: Description,

    /// Assigned when the record enters the registry
    pub category_label: CategoryLabel,
}

impl BookRecord {
    /// Deduplication fingerprint: lowercase title followed by author.
    pub fn identity_key(&self) -> String {
        format!("{}{}", self.title, self.author).to_lowercase()
    }

    /// Flatten into the export schema.
    pub fn to_output(&self) -> BookOutput {
        BookOutput {
            category_label: self.category_label,
            cover_url: self.cover_url.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            year: self.year.clone(),
            description: self.description.text().to_string(),
            link: self.link.clone(),
            description_status: self.description.status(),
        }
    }
}

/// Export record consumed by the display layer.
///
/// Field order is part of the contract; new fields may only be appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOutput {
    pub category_label: CategoryLabel,
    pub cover_url: Option<String>,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: String,
    pub description: String,
    pub link: Option<String>,
    pub description_status: DescriptionStatus,
}
