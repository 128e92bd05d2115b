//! REST API: router wiring for journal entries.

pub mod errors;
pub mod handlers;
pub mod models;

use axum::routing::get;
use axum::Router;
use handlers::AppState;

/// Builds the Axum router for the entry endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/entries/{id}",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .with_state(state)
}
