//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── books.json        # Every record, registry order
//! ├── priority.json     # Priority publishers only
//! └── stats.json        # Statistics of the last run
//! ```
//!
//! Files are written atomically: a temporary sibling is written first and
//! renamed over the target.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{BookOutput, BookRecord, OutputConfig};
use crate::pipeline::RunOutcome;
use crate::storage::{RecordSink, RecordsFile, WriteSummary};

const STATS_FILE: &str = "stats.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    records_file: String,
    priority_file: String,
}

impl LocalStorage {
    /// Create a LocalStorage from the output settings.
    pub fn new(output: &OutputConfig) -> Self {
        Self::with_root(&output.dir, output)
    }

    /// Create a LocalStorage rooted at `root_dir`, overriding `output.dir`.
    pub fn with_root(root_dir: impl Into<PathBuf>, output: &OutputConfig) -> Self {
        Self {
            root_dir: root_dir.into(),
            records_file: output.records_file.clone(),
            priority_file: output.priority_file.clone(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RecordSink for LocalStorage {
    async fn write_records(
        &self,
        records: &[BookRecord],
        stats: &RunOutcome,
    ) -> Result<WriteSummary> {
        let all: Vec<BookOutput> = records.iter().map(BookRecord::to_output).collect();
        let priority: Vec<BookOutput> = all
            .iter()
            .filter(|r| r.category_label.is_priority())
            .cloned()
            .collect();

        let all = RecordsFile::new(all);
        let priority = RecordsFile::new(priority);

        self.write_json(&self.records_file, &all).await?;
        log::info!("{} records written to {}", all.count, self.records_file);

        self.write_json(&self.priority_file, &priority).await?;
        log::info!("{} records written to {}", priority.count, self.priority_file);

        // Write stats for debugging
        self.write_json(STATS_FILE, stats).await?;

        Ok(WriteSummary {
            record_count: all.count,
            priority_count: priority.count,
            location: self.root_dir.display().to_string(),
        })
    }

    async fn load_records(&self) -> Result<Option<RecordsFile>> {
        self.read_json(&self.records_file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryLabel, Description, DescriptionStatus};
    use crate::services::{PublisherAllowList, Registry};

    fn record(title: &str, publisher: &str) -> BookRecord {
        BookRecord {
            cover_url: None,
            title: title.to_string(),
            author: "Autore".to_string(),
            publisher: publisher.to_string(),
            year: "2024".to_string(),
            link: None,
            description: Description::NotAttempted,
            category_label: CategoryLabel::Other,
        }
    }

    #[tokio::test]
    async fn test_write_and_load_records() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::with_root(dir.path(), &OutputConfig::default());

        let mut registry = Registry::new(PublisherAllowList::new(["Laterza"]));
        registry.insert(record("Primo", "Laterza"));
        registry.insert(record("Secondo", "Adelphi"));
        for r in registry.priority_subset_mut() {
            r.description = Description::Timeout;
        }

        let summary = storage.write_records(registry.all(), &RunOutcome::started()).await.unwrap();
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.priority_count, 1);

        let loaded = storage.load_records().await.unwrap().unwrap();
        assert_eq!(loaded.count, 2);
        assert_eq!(loaded.records[0].title, "Primo");
        assert_eq!(loaded.records[0].description_status, DescriptionStatus::Timeout);
        assert_eq!(loaded.records[1].description, "");

        let priority: RecordsFile = storage.read_json("priority.json").await.unwrap().unwrap();
        assert_eq!(priority.records.len(), 1);
        assert!(dir.path().join("stats.json").exists());
        assert!(!dir.path().join("books.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_without_export_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::with_root(dir.path(), &OutputConfig::default());
        assert!(storage.load_records().await.unwrap().is_none());
    }
}
