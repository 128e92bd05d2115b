//! Request and response bodies for the REST API.

use serde::{Deserialize, Serialize};

/// Body of `POST /entries` and `PUT /entries/{id}`.
///
/// Missing fields default to the empty string; on update an empty field
/// keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
