// src/services/paginator.rs

//! Page-by-page traversal of one category listing.

use futures::stream::{self, Stream, StreamExt};

use crate::error::Result;
use crate::models::{BookRecord, Config, CrawlerConfig, ElementMatcher, Seed};
use crate::render::Renderer;
use crate::services::CardExtractor;

/// Records extracted from one listing page.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// 1-based page number
    pub number: u32,
    pub url: String,
    pub records: Vec<BookRecord>,
}

/// Walks the pages of a seed until a page comes back empty or the page cap
/// is exceeded.
///
/// Render failures and expired waits count as an empty page, which ends the
/// seed. The consent banner is dismissed once per seed, on page 1.
pub struct ListPaginator<'r> {
    renderer: &'r dyn Renderer,
    extractor: CardExtractor,
    consent_button: ElementMatcher,
    page_param: String,
    max_pages: u32,
    timing: CrawlerConfig,
}

impl<'r> ListPaginator<'r> {
    pub fn new(renderer: &'r dyn Renderer, config: &Config) -> Result<Self> {
        let extractor = CardExtractor::new(config.selectors.listing.clone(), config.site.base()?);
        Ok(Self {
            renderer,
            extractor,
            consent_button: config.selectors.listing.consent_button.clone(),
            page_param: config.site.page_param.clone(),
            max_pages: config.site.max_pages,
            timing: config.crawler.clone(),
        })
    }

    /// Lazily visit the seed's pages in increasing order.
    ///
    /// Each non-empty page is yielded once; the empty page that ends the
    /// traversal is not.
    pub fn pages<'a>(&'a self, seed: &'a Seed) -> impl Stream<Item = ListingPage> + 'a {
        stream::unfold(1u32, move |number| async move {
            if number > self.max_pages {
                log::warn!(
                    "[{}] Page cap of {} reached, stopping",
                    seed.name,
                    self.max_pages
                );
                return None;
            }

            let page = self.fetch_page(seed, number).await?;
            if page.records.is_empty() {
                log::debug!("[{}] Page {} is empty, end of listing", seed.name, number);
                return None;
            }

            let delay = self.timing.page_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Some((page, number + 1))
        })
    }

    /// Lazily yield every record of the seed, page after page.
    pub fn traverse<'a>(&'a self, seed: &'a Seed) -> impl Stream<Item = BookRecord> + 'a {
        self.pages(seed).flat_map(|page| stream::iter(page.records))
    }

    /// Render and extract one page. `None` only when the page URL cannot be
    /// built; every render problem yields an empty page.
    async fn fetch_page(&self, seed: &Seed, number: u32) -> Option<ListingPage> {
        let url = match seed.page_url(&self.page_param, number) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("[{}] Cannot build URL for page {}: {}", seed.name, number, e);
                return None;
            }
        };

        let records = self.render_records(&url, number == 1).await;
        Some(ListingPage {
            number,
            url,
            records,
        })
    }

    async fn render_records(&self, url: &str, first_page: bool) -> Vec<BookRecord> {
        if let Err(e) = self.renderer.navigate(url).await {
            log::warn!("Failed to load {}: {}", url, e);
            return Vec::new();
        }

        if first_page {
            if let Err(e) = self
                .renderer
                .click(&self.consent_button, self.timing.consent_wait())
                .await
            {
                log::debug!("No consent banner dismissed: {}", e);
            }
        }

        if let Err(e) = self
            .renderer
            .wait_for(self.extractor.card_matcher(), self.timing.list_wait())
            .await
        {
            log::debug!("No listing cards on {}: {}", url, e);
            return Vec::new();
        }

        match self.renderer.scroll_to_bottom().await {
            Ok(()) => {
                let settle = self.timing.scroll_settle();
                if !settle.is_zero() {
                    tokio::time::sleep(settle).await;
                }
            }
            Err(e) => log::debug!("Page not scrolled: {}", e),
        }

        match self.renderer.page_source().await {
            Ok(html) => self.extractor.extract_page(&html),
            Err(e) => {
                log::warn!("Failed to read {}: {}", url, e);
                Vec::new()
            }
        }
    }
}
