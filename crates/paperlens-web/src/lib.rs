//! HTTP surface for research paper analysis.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use paperlens_core::config_file::ServerConfig;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::AppState;

/// Full paper texts are posted back to `/get-overall-summary`.
const BODY_LIMIT: usize = 32 * 1024 * 1024;

/// The analysis routes without CORS or request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/analyze-paper",
            post(handlers::paper::analyze_paper),
        )
        .route(
            "/get-overall-summary",
            post(handlers::summary::overall_summary),
        )
        .route(
            "/analyze-section",
            post(handlers::section::analyze_section),
        )
        .route("/test-api-key", get(handlers::api_key::test_api_key))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

/// The complete application: routes, CORS for the configured origin, and tracing.
pub fn app(state: Arc<AppState>, server: &ServerConfig) -> anyhow::Result<Router> {
    Ok(router(state)
        .layer(cors_layer(&server.cors_origin)?)
        .layer(TraceLayer::new_for_http()))
}

/// CORS for a single origin; `*` allows any origin.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(HeaderValue::from_str(origin.trim())?)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_wildcard_and_exact_origins() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("http://localhost:3000").is_ok());
    }

    #[test]
    fn cors_rejects_invalid_origin() {
        assert!(cors_layer("http://bad\norigin").is_err());
    }
}
