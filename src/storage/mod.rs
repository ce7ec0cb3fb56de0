//! Storage abstractions for record export.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml      # Scraper configuration
//! ├── books.json       # Every unique record of the last run
//! └── priority.json    # Priority publishers only
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{BookOutput, BookRecord};
use crate::pipeline::RunOutcome;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about an export.
#[derive(Debug, Clone)]
pub struct WriteSummary {
    /// Records written to the full export
    pub record_count: usize,
    /// Records written to the priority export
    pub priority_count: usize,
    /// Human-readable destination
    pub location: String,
}

/// Envelope of an export file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsFile {
    /// ISO 8601 timestamp of the export
    pub updated_at: DateTime<Utc>,
    pub count: usize,
    pub records: Vec<BookOutput>,
}

impl RecordsFile {
    pub fn new(records: Vec<BookOutput>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: records.len(),
            records,
        }
    }
}

/// Destination for the final record set of a run.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Export `records` (registry order) together with run statistics.
    async fn write_records(&self, records: &[BookRecord], stats: &RunOutcome)
    -> Result<WriteSummary>;

    /// Load the records of the last full export, if any.
    async fn load_records(&self) -> Result<Option<RecordsFile>>;
}
