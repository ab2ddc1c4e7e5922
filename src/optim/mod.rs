//! HTTP relay to the optimization service.
//!
//! Requests are forwarded as-is: no timeout, retry or schema validation.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::models::{OptimRequest, OptimResponse};

/// Default optimizer endpoint.
pub const DEFAULT_OPTIMIZER_URL: &str = "http://128.179.165.91:8000";

/// Optimizer relay errors.
#[derive(Debug, Error)]
pub enum OptimError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Optimizer returned {0}: {1}")]
    Status(StatusCode, String),
}

/// Client for the optimization service.
#[derive(Debug, Clone)]
pub struct OptimizerClient {
    url: String,
    client: Client,
}

impl OptimizerClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the optimizer for a recommendation in `context`.
    pub async fn recommend(&self, context: Value) -> Result<OptimResponse, OptimError> {
        tracing::info!("Recommend");
        self.send(&OptimRequest::recommend(context)).await
    }

    /// Report `score` for `item` in `context`.
    pub async fn report(
        &self,
        context: Value,
        item: Value,
        score: Value,
    ) -> Result<OptimResponse, OptimError> {
        tracing::info!("Report");
        self.send(&OptimRequest::report(context, item, score)).await
    }

    async fn send(&self, request: &OptimRequest) -> Result<OptimResponse, OptimError> {
        let response = self.client.post(&self.url).json(request).send().await?;
        let status = response.status();
        let content = response.text().await?;

        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(
                "Optimizer rejected {} request: {}",
                request.request_type.as_str(),
                status
            );
            return Err(OptimError::Status(status, content));
        }

        let data = serde_json::from_str(&content).ok();
        let result = OptimResponse {
            status_code: status.as_u16(),
            content,
            data,
        };
        tracing::info!("{:?}", result);
        Ok(result)
    }
}
