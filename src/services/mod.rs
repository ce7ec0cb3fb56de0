//! Service layer for the scraper.
//!
//! This module contains the business logic for:
//! - Listing card extraction (`CardExtractor`)
//! - Synopsis extraction (`DetailExtractor`)
//! - Listing traversal (`ListPaginator`)
//! - Deduplication (`Registry`)
//! - Priority publisher classification (`PublisherAllowList`)
//! - Synopsis enrichment (`DetailEnricher`)

mod cards;
mod details;
mod enricher;
mod paginator;
mod publishers;
mod registry;

pub use cards::{CardExtractor, split_publisher_year};
pub use details::DetailExtractor;
pub use enricher::{DetailEnricher, EnrichmentOutcome};
pub use paginator::{ListPaginator, ListingPage};
pub use publishers::PublisherAllowList;
pub use registry::Registry;
