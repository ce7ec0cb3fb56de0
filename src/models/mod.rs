// src/models/mod.rs

//! Domain models for the scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod book;
mod config;
mod seed;
mod selectors;

// Re-export all public types
pub use book::{
    BookOutput, BookRecord, CategoryLabel, Description, DescriptionStatus, NO_LINK_DESCRIPTION,
    TIMEOUT_DESCRIPTION, UNKNOWN,
};
pub use config::{
    Config, CrawlerConfig, DetailSelectors, ListingSelectors, OutputConfig, SelectorConfig,
    SiteConfig,
};
pub use seed::Seed;
pub use selectors::{ElementMatcher, class_list_contains};
