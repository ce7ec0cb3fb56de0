// src/models/seed.rs

//! Category listing entry points.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// One category listing that is traversed page by page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Category display name (e.g., "Storia e archeologia")
    pub name: String,

    /// URL of the first listing page
    pub url: String,
}

impl Seed {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// URL of the given 1-based page.
    ///
    /// Page 1 is the seed URL untouched; later pages append `param=page`
    /// to the existing query string.
    pub fn page_url(&self, param: &str, page: u32) -> Result<String> {
        if page <= 1 {
            return Ok(self.url.clone());
        }
        let mut url = Url::parse(&self.url)?;
        url.query_pairs_mut().append_pair(param, &page.to_string());
        Ok(url.to_string())
    }

    /// Check that the seed URL parses as an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "Seed '{}' has unsupported scheme '{}'",
                self.name,
                url.scheme()
            )));
        }
        Ok(())
    }
}
