// src/lib.rs

//! Novita Scraper Library
//!
//! Collects newly listed non-fiction books from the IBS.it catalog,
//! deduplicates them and fetches synopses for priority publishers.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod storage;
pub mod utils;
