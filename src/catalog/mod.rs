//! Activity catalog: remote client, search filter and the library panel model.

mod filter;
mod library;

pub use filter::filter_catalog;
pub use library::{LessonGraph, Library, LoadStatus};

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::CatalogEntry;

/// Default catalog host.
pub const DEFAULT_CATALOG_URL: &str = "http://icchilisrv4.epfl.ch:5000";

/// Catalog client errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog returned {0}: {1}")]
    Status(StatusCode, String),
}

/// HTTP client for the activity catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every catalog entry. No pagination.
    pub async fn fetch_all(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let url = format!("{}/activities", self.base_url);
        tracing::debug!("Fetching activity catalog from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status(status, body));
        }
        Ok(response.json().await?)
    }
}
