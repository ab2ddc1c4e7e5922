mod handlers;
pub mod middleware;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::optim::OptimizerClient;

pub use middleware::{RateLimiter, SecurityConfig};

/// Upstream clients shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: CatalogClient,
    pub optimizer: OptimizerClient,
}

impl AppState {
    pub fn new(catalog: CatalogClient, optimizer: OptimizerClient) -> Self {
        Self { catalog, optimizer }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CatalogClient::new(&config.catalog_url),
            OptimizerClient::new(&config.optimizer_url),
        )
    }
}

pub fn create_router(state: AppState, security: SecurityConfig) -> Router {
    let mut optim = Router::new()
        .route("/optim/recommend", post(handlers::recommend))
        .route("/optim/report", post(handlers::report))
        .route_layer(from_fn_with_state(
            security.clone(),
            middleware::auth_middleware,
        ));
    if let Some(limiter) = security.rate_limiter.clone() {
        optim = optim.route_layer(from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    let api = Router::new()
        // Activity library
        .route("/library", get(handlers::search_library))
        // Health
        .route("/health", get(handlers::health))
        .merge(optim);

    let cors = match security.allowed_origins() {
        Some(origins) => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
