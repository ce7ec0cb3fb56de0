//! Pipeline entry points.
//!
//! - `run_scraper`: Traverse listings and enrich priority records
//! - `run_pipeline`: Scrape, then export through a `RecordSink`

pub mod scrape;

pub use scrape::{RunOptions, RunOutcome, run_pipeline, run_scraper};
