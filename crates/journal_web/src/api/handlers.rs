//! HTTP request handlers and shared application state.

use crate::api::errors::ApiError;
use crate::api::models::{EntryInput, HealthResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use journal_core::{core_version, DynStorage, Entry, Journal, JournalResult};
use std::sync::Arc;

/// Shared application state passed to every handler via Axum's `State` extractor.
///
/// The journal is built once at startup and injected here; handlers never
/// reach for process-wide state.
#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<Journal<DynStorage>>,
}

impl AppState {
    pub fn new(journal: Journal<DynStorage>) -> Self {
        Self {
            journal: Arc::new(journal),
        }
    }
}

/// Runs a synchronous journal call on the blocking pool.
///
/// Both storage backends perform blocking I/O.
async fn run_blocking<T, F>(state: &AppState, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Journal<DynStorage>) -> JournalResult<T> + Send + 'static,
{
    let journal = Arc::clone(&state.journal);
    tokio::task::spawn_blocking(move || call(&journal))
        .await
        .map_err(|err| ApiError::Internal(format!("journal task failed: {err}")))?
        .map_err(ApiError::from)
}

/// GET /entries
pub async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<Entry>>, ApiError> {
    let entries = run_blocking(&state, |journal| journal.list_entries()).await?;
    Ok(Json(entries))
}

/// POST /entries
pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<EntryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let Json(input) = payload?;
    let entry = run_blocking(&state, move |journal| {
        journal.create_entry(input.title, input.content)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    let entry = run_blocking(&state, move |journal| journal.get_entry(&id)).await?;
    Ok(Json(entry))
}

/// PUT /entries/{id}
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EntryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let Json(input) = payload?;
    let entry = run_blocking(&state, move |journal| {
        journal.update_entry(&id, &input.title, &input.content)
    })
    .await?;
    Ok((StatusCode::ACCEPTED, Json(entry)))
}

/// DELETE /entries/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run_blocking(&state, move |journal| journal.delete_entry(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}
