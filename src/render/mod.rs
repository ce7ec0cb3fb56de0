//! Page rendering capability.
//!
//! The scraper drives a single rendering session for the whole run. A
//! session navigates to one page at a time, can wait (boundedly) for an
//! element to appear, and hands back the final document markup.

pub mod http;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ElementMatcher;

pub use http::HttpRenderer;
pub use memory::MemoryRenderer;

/// A single page rendering session.
///
/// Implementations keep the "current page" as session state; every method
/// operates on the page loaded by the most recent [`Renderer::navigate`].
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Load `url`, replacing the current page.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait until an element matching `target` is present.
    ///
    /// Returns [`AppError::Timeout`](crate::error::AppError::Timeout) once
    /// `timeout` expires without a match.
    async fn wait_for(&self, target: &ElementMatcher, timeout: Duration) -> Result<()>;

    /// Wait for `target` and activate it.
    ///
    /// Sessions that cannot interact with the page return
    /// [`AppError::Render`](crate::error::AppError::Render).
    async fn click(&self, target: &ElementMatcher, timeout: Duration) -> Result<()>;

    /// Scroll the viewport towards the end of the page so lazy content loads.
    /// Fails like [`Renderer::click`] when unsupported.
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Markup of the current page.
    async fn page_source(&self) -> Result<String>;

    /// Release the session. Later calls may fail.
    async fn close(&self) -> Result<()>;
}
