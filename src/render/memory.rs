// src/render/memory.rs

//! In-memory rendering session serving preloaded documents.
//!
//! Useful for replaying saved pages offline and for exercising the
//! scraper without network access.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::ElementMatcher;
use crate::render::Renderer;

#[derive(Debug, Default)]
struct SessionState {
    current: Option<String>,
    navigations: Vec<String>,
    clicks: Vec<String>,
}

/// Renderer backed by a URL → markup map.
///
/// URLs registered with [`MemoryRenderer::with_stalled`] load but never
/// satisfy a wait; URLs with no document fail to navigate.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    documents: HashMap<String, String>,
    stalled: HashSet<String>,
    state: Mutex<SessionState>,
    closed: AtomicBool,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.documents.insert(url.into(), html.into());
        self
    }

    /// Make every wait on `url` time out.
    pub fn with_stalled(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.documents.entry(url.clone()).or_default();
        self.stalled.insert(url);
        self
    }

    /// URLs navigated to so far, in order.
    pub async fn navigations(&self) -> Vec<String> {
        self.state.lock().await.navigations.clone()
    }

    /// URLs of the pages a click was attempted on, in order.
    pub async fn clicks(&self) -> Vec<String> {
        self.state.lock().await.clicks.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(AppError::render("rendering session is closed"));
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.ensure_open()?;
        self.state
            .lock()
            .await
            .current
            .clone()
            .ok_or_else(|| AppError::render("no page loaded"))
    }
}

#[async_trait]
impl Renderer for MemoryRenderer {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.state.lock().await;
        state.navigations.push(url.to_string());

        if self.documents.contains_key(url) {
            state.current = Some(url.to_string());
            Ok(())
        } else {
            state.current = None;
            Err(AppError::render(format!("no document for {url}")))
        }
    }

    async fn wait_for(&self, target: &ElementMatcher, timeout: Duration) -> Result<()> {
        let url = self.current_url().await?;
        if self.stalled.contains(&url) {
            return Err(AppError::timeout(url, timeout));
        }

        let html = self.documents.get(&url).map(String::as_str).unwrap_or_default();
        let found = target
            .find_in_document(&Html::parse_document(html))
            .is_some();
        if found {
            Ok(())
        } else {
            Err(AppError::timeout(url, timeout))
        }
    }

    async fn click(&self, target: &ElementMatcher, timeout: Duration) -> Result<()> {
        let url = self.current_url().await?;
        self.state.lock().await.clicks.push(url);
        self.wait_for(target, timeout).await
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn page_source(&self) -> Result<String> {
        let url = self.current_url().await?;
        Ok(self.documents.get(&url).cloned().unwrap_or_default())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
