// src/render/http.rs

//! Rendering session backed by plain HTTP requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, ElementMatcher};
use crate::render::Renderer;

/// The page most recently loaded by the session.
#[derive(Debug, Clone)]
struct LoadedPage {
    url: String,
    html: String,
}

/// Renderer that fetches server-side markup with one shared HTTP client.
///
/// Documents are static once fetched, so waiting for an element amounts to
/// checking the fetched markup: a missing element is reported as a timeout
/// straight away instead of sleeping until the deadline. Nothing runs
/// scripts, so `click` and `scroll_to_bottom` are unsupported and fail with
/// [`AppError::Render`].
pub struct HttpRenderer {
    client: reqwest::Client,
    request_timeout: Duration,
    page: Mutex<Option<LoadedPage>>,
    closed: AtomicBool,
}

impl HttpRenderer {
    /// Create a configured rendering session.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let request_timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            request_timeout,
            page: Mutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AppError::render("rendering session is closed"));
        }
        Ok(())
    }

    async fn set_page(&self, url: &str, html: String) {
        *self.page.lock().await = Some(LoadedPage {
            url: url.to_string(),
            html,
        });
    }

    async fn current(&self) -> Result<LoadedPage> {
        self.ensure_open()?;
        self.page
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::render("no page loaded"))
    }

    fn contains(html: &str, target: &ElementMatcher) -> bool {
        let document = Html::parse_document(html);
        target.find_in_document(&document).is_some()
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        log::debug!("GET {}", url);

        let fetched: reqwest::Result<String> = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            response.text().await
        }
        .await;

        match fetched {
            Ok(html) => {
                self.set_page(url, html).await;
                Ok(())
            }
            Err(e) if e.is_timeout() => Err(AppError::timeout(url, self.request_timeout)),
            Err(e) => Err(AppError::Http(e)),
        }
    }

    async fn wait_for(&self, target: &ElementMatcher, timeout: Duration) -> Result<()> {
        let page = self.current().await?;
        if Self::contains(&page.html, target) {
            Ok(())
        } else {
            Err(AppError::timeout(page.url, timeout))
        }
    }

    async fn click(&self, target: &ElementMatcher, timeout: Duration) -> Result<()> {
        self.wait_for(target, timeout).await?;
        Err(AppError::render(format!(
            "cannot click {:?}: unsupported on static markup",
            target
        )))
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.ensure_open()?;
        Err(AppError::render("cannot scroll: unsupported on static markup"))
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.current().await?.html)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        self.page.lock().await.take();
        Ok(())
    }
}
