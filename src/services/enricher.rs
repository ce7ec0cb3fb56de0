// src/services/enricher.rs

//! Second-phase synopsis enrichment.

use crate::error::Result;
use crate::models::{BookRecord, Config, CrawlerConfig, Description, ElementMatcher};
use crate::render::Renderer;
use crate::services::DetailExtractor;

/// Per-outcome counts of an enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    pub total: usize,
    pub fetched: usize,
    pub empty: usize,
    pub timeouts: usize,
    pub no_link: usize,
    pub failed: usize,
}

impl EnrichmentOutcome {
    fn record(&mut self, description: &Description) {
        self.total += 1;
        match description {
            Description::Fetched(_) => self.fetched += 1,
            Description::Empty => self.empty += 1,
            Description::Timeout => self.timeouts += 1,
            Description::NoLink => self.no_link += 1,
            Description::Failed => self.failed += 1,
            Description::NotAttempted => {}
        }
    }
}

/// Fetches detail pages and stores their synopsis on the records.
///
/// A failing detail page only affects its own record: the failure becomes
/// that record's description state and the batch moves on.
pub struct DetailEnricher<'r> {
    renderer: &'r dyn Renderer,
    extractor: DetailExtractor,
    heading: ElementMatcher,
    timing: CrawlerConfig,
}

impl<'r> DetailEnricher<'r> {
    pub fn new(renderer: &'r dyn Renderer, config: &Config) -> Self {
        Self {
            renderer,
            extractor: DetailExtractor::new(config.selectors.detail.clone()),
            heading: config.selectors.detail.heading.clone(),
            timing: config.crawler.clone(),
        }
    }

    /// Enrich each record in order, overwriting its description.
    pub async fn enrich_all(&self, records: Vec<&mut BookRecord>) -> EnrichmentOutcome {
        let mut outcome = EnrichmentOutcome::default();
        let total = records.len();

        for (i, record) in records.into_iter().enumerate() {
            log::info!("[{}/{}] {}", i + 1, total, record.title);
            record.description = self.describe(record.link.as_deref()).await;
            outcome.record(&record.description);
        }
        outcome
    }

    /// Synopsis state for a detail link. Never fails.
    pub async fn describe(&self, link: Option<&str>) -> Description {
        let Some(url) = link else {
            return Description::NoLink;
        };

        match self.fetch_synopsis(url).await {
            Ok(text) => {
                let description = Description::from_extracted(text);
                if description == Description::Empty {
                    log::debug!("No synopsis found on {}", url);
                }
                description
            }
            Err(e) if e.is_timeout() => {
                log::warn!("Detail page timed out: {}", e);
                Description::Timeout
            }
            Err(e) => {
                log::warn!("Detail page failed for {}: {}", url, e);
                Description::Failed
            }
        }
    }

    async fn fetch_synopsis(&self, url: &str) -> Result<String> {
        self.renderer.navigate(url).await?;
        self.renderer
            .wait_for(&self.heading, self.timing.detail_wait())
            .await?;

        let pause = self.timing.detail_delay();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let html = self.renderer.page_source().await?;
        Ok(self.extractor.extract(&html))
    }
}
