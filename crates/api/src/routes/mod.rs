//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod health;
pub mod reports;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(reports::routes())
        .merge(accounts::routes())
}
