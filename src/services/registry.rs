// src/services/registry.rs

//! Identity-keyed record registry.

use std::collections::HashMap;

use crate::models::BookRecord;
use crate::services::PublisherAllowList;

/// Deduplicating store for every record of a run.
///
/// Keys are [`BookRecord::identity_key`]. The first record inserted under a
/// key is kept and later ones are dropped, whichever page or seed they came
/// from. Records are classified against the allow-list as they enter.
#[derive(Debug, Default)]
pub struct Registry {
    allow_list: PublisherAllowList,
    records: Vec<BookRecord>,
    index: HashMap<String, usize>,
    duplicates: usize,
}

impl Registry {
    pub fn new(allow_list: PublisherAllowList) -> Self {
        Self {
            allow_list,
            ..Self::default()
        }
    }

    /// Insert a record unless its key is already present.
    ///
    /// Returns `true` when the record was stored.
    pub fn insert(&mut self, mut record: BookRecord) -> bool {
        let key = record.identity_key();
        if self.index.contains_key(&key) {
            self.duplicates += 1;
            return false;
        }

        record.category_label = self.allow_list.classify(&record.publisher);
        self.index.insert(key, self.records.len());
        self.records.push(record);
        true
    }

    pub fn get(&self, identity_key: &str) -> Option<&BookRecord> {
        self.index.get(identity_key).map(|&i| &self.records[i])
    }

    /// Records on the priority allow-list, in insertion order.
    pub fn priority_subset(&self) -> Vec<&BookRecord> {
        self.records
            .iter()
            .filter(|r| r.category_label.is_priority())
            .collect()
    }

    /// Mutable view of the priority records, in insertion order.
    pub fn priority_subset_mut(&mut self) -> impl Iterator<Item = &mut BookRecord> {
        self.records
            .iter_mut()
            .filter(|r| r.category_label.is_priority())
    }

    /// Every record, in insertion order.
    pub fn all(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of inserts rejected as duplicates.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
