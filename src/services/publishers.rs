// src/services/publishers.rs

//! Priority publisher classification.

use crate::models::CategoryLabel;

/// Fixed allow-list of publisher names, matched case-insensitively as
/// substrings of a record's publisher.
#[derive(Debug, Clone, Default)]
pub struct PublisherAllowList {
    /// Lowercased, trimmed entries
    entries: Vec<String>,
}

impl PublisherAllowList {
    pub fn new<I, S>(publishers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = publishers
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { entries }
    }

    /// True iff some allow-list entry occurs in `publisher`.
    pub fn is_priority(&self, publisher: &str) -> bool {
        let publisher = publisher.to_lowercase();
        self.entries.iter().any(|entry| publisher.contains(entry.as_str()))
    }

    pub fn classify(&self, publisher: &str) -> CategoryLabel {
        if self.is_priority(publisher) {
            CategoryLabel::Priority
        } else {
            CategoryLabel::Other
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
