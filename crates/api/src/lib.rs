//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Read-only REST routes for financial statements and account ledgers
//! - JSON error responses mapped from application errors

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use neraca_core::reports::ReportService;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Report service over the configured ledger store.
    pub reports: Arc<ReportService>,
}

impl AppState {
    /// Creates state around a report service.
    #[must_use]
    pub fn new(reports: ReportService) -> Self {
        Self {
            reports: Arc::new(reports),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
