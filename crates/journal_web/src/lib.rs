//! HTTP front-end for the journal.
//!
//! # Responsibility
//! - Expose `Journal` use-cases as a JSON REST API.
//! - Map domain errors to HTTP status codes.

/// REST API layer: router, handlers, models, error mapping.
pub mod api;
/// Command-line / environment options for the server binary.
pub mod config;

pub use api::handlers::AppState;
pub use api::create_router;
