// src/pipeline/scrape.rs

//! Run orchestration: listings first, then synopsis enrichment, then export.

use chrono::{DateTime, Utc};
use futures::{StreamExt, pin_mut};
use serde::Serialize;

use crate::error::Result;
use crate::models::{BookRecord, Config};
use crate::render::Renderer;
use crate::services::{
    DetailEnricher, EnrichmentOutcome, ListPaginator, PublisherAllowList, Registry,
};
use crate::storage::RecordSink;

/// Switches for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after the listing phase
    pub skip_enrichment: bool,
}

/// Statistics of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub seeds: usize,
    /// Listing pages that produced at least one book
    pub pages: usize,
    pub cards: usize,
    pub unique: usize,
    pub duplicates: usize,
    pub priority: usize,
    pub enriched: usize,
    pub synopsis_empty: usize,
    pub timeouts: usize,
    pub no_link: usize,
    pub failed: usize,
}

impl RunOutcome {
    /// Empty statistics stamped with the current time.
    pub fn started() -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            seeds: 0,
            pages: 0,
            cards: 0,
            unique: 0,
            duplicates: 0,
            priority: 0,
            enriched: 0,
            synopsis_empty: 0,
            timeouts: 0,
            no_link: 0,
            failed: 0,
        }
    }

    fn absorb(&mut self, enrichment: EnrichmentOutcome) {
        self.enriched = enrichment.fetched;
        self.synopsis_empty = enrichment.empty;
        self.timeouts = enrichment.timeouts;
        self.no_link = enrichment.no_link;
        self.failed = enrichment.failed;
    }

    /// Log the run summary.
    pub fn log_summary(&self) {
        let elapsed = self.end_time - self.start_time;
        log::info!("Run finished in {}s", elapsed.num_seconds());
        log::info!(
            "  Listings: {} seeds, {} pages, {} cards",
            self.seeds,
            self.pages,
            self.cards
        );
        log::info!(
            "  Records: {} unique, {} duplicates discarded, {} priority",
            self.unique,
            self.duplicates,
            self.priority
        );
        log::info!(
            "  Synopses: {} fetched, {} empty, {} timed out, {} without link, {} failed",
            self.enriched,
            self.synopsis_empty,
            self.timeouts,
            self.no_link,
            self.failed
        );
    }
}

/// Run both phases with `renderer`, closing the session on every exit path.
pub async fn run_scraper(
    config: &Config,
    renderer: &dyn Renderer,
    options: RunOptions,
) -> Result<(Registry, RunOutcome)> {
    let result = run_phases(config, renderer, options).await;

    if let Err(e) = renderer.close().await {
        log::warn!("Failed to close rendering session: {}", e);
    }
    result
}

/// Run the scraper and hand every record to `sink`.
pub async fn run_pipeline(
    config: &Config,
    renderer: &dyn Renderer,
    sink: &dyn RecordSink,
    options: RunOptions,
) -> Result<RunOutcome> {
    let (registry, outcome) = run_scraper(config, renderer, options).await?;
    outcome.log_summary();

    if registry.is_empty() {
        log::warn!("No books found, nothing to export");
        return Ok(outcome);
    }

    let summary = sink.write_records(registry.all(), &outcome).await?;
    log::info!(
        "Exported {} records ({} priority) to {}",
        summary.record_count,
        summary.priority_count,
        summary.location
    );
    Ok(outcome)
}

async fn run_phases(
    config: &Config,
    renderer: &dyn Renderer,
    options: RunOptions,
) -> Result<(Registry, RunOutcome)> {
    let mut outcome = RunOutcome::started();
    let mut registry = Registry::new(PublisherAllowList::new(&config.publishers));

    log::info!("=== Phase 1: scanning {} listings ===", config.seeds.len());
    collect_listings(config, renderer, &mut registry, &mut outcome).await?;

    outcome.unique = registry.len();
    outcome.duplicates = registry.duplicates();
    outcome.priority = registry.priority_subset().len();

    if options.skip_enrichment {
        log::info!("Skipping synopsis enrichment");
    } else {
        log::info!("=== Phase 2: fetching {} synopses ===", outcome.priority);
        let enricher = DetailEnricher::new(renderer, config);
        let targets: Vec<&mut BookRecord> = registry.priority_subset_mut().collect();
        outcome.absorb(enricher.enrich_all(targets).await);
    }

    outcome.end_time = Utc::now();
    Ok((registry, outcome))
}

/// Traverse every seed in order and feed its records to the registry.
async fn collect_listings(
    config: &Config,
    renderer: &dyn Renderer,
    registry: &mut Registry,
    outcome: &mut RunOutcome,
) -> Result<()> {
    let paginator = ListPaginator::new(renderer, config)?;

    for seed in &config.seeds {
        log::info!("--- {} ---", seed.name);
        outcome.seeds += 1;

        let pages = paginator.pages(seed);
        pin_mut!(pages);
        while let Some(page) = pages.next().await {
            log::debug!("  page {} rendered from {}", page.number, page.url);
            outcome.pages += 1;
            outcome.cards += page.records.len();

            let found = page.records.len();
            let added = page
                .records
                .into_iter()
                .map(|record| registry.insert(record))
                .filter(|&inserted| inserted)
                .count();
            log::info!("  page {}: {} books, {} new", page.number, found, added);
        }
    }
    Ok(())
}
