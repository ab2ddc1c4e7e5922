use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::catalog::filter_catalog;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log an upstream failure and return a sanitized 502 to the client.
fn upstream_error(service: &str, e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("{} request failed: {}", service, e);
    (
        StatusCode::BAD_GATEWAY,
        format!("{} unavailable", service),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Activity Library
// ============================================================

/// Query parameters for searching the activity catalog.
#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    /// Case-insensitive search over type, title, description and tags.
    #[serde(default)]
    pub q: Option<String>,
}

/// Fetch the catalog and return matching entries sorted by title.
pub async fn search_library(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Result<Json<Vec<CatalogEntry>>, (StatusCode, String)> {
    let entries = state
        .catalog
        .fetch_all()
        .await
        .map_err(|e| upstream_error("Catalog", e))?;

    let search = query.q.as_deref().unwrap_or_default();
    let matched = filter_catalog(&entries, search)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(matched))
}

// ============================================================
// Optimizer
// ============================================================

pub async fn recommend(
    State(state): State<AppState>,
    Json(input): Json<RecommendInput>,
) -> Result<Json<OptimResponse>, (StatusCode, String)> {
    state
        .optimizer
        .recommend(input.context)
        .await
        .map(Json)
        .map_err(|e| upstream_error("Optimizer", e))
}

pub async fn report(
    State(state): State<AppState>,
    Json(input): Json<ReportInput>,
) -> Result<Json<OptimResponse>, (StatusCode, String)> {
    state
        .optimizer
        .report(input.context, input.item, input.score)
        .await
        .map(Json)
        .map_err(|e| upstream_error("Optimizer", e))
}
