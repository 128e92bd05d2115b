//! Entry domain model.
//!
//! # Responsibility
//! - Define the canonical journal record and its partial-update payload.
//! - Provide the merge rule applied by `Journal` updates.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `updated >= created` for every persisted entry.
//! - Timestamps carry millisecond precision so every backend round-trips them.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque entry identifier (UUID v4 text for generated entries).
pub type EntryId = String;

/// One journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    /// Set once at creation.
    pub created: DateTime<Utc>,
    /// Refreshed on every successful mutation.
    pub updated: DateTime<Utc>,
}

/// Field-level update request.
///
/// `None` keeps the current value; `Some` replaces it, even with an empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl EntryUpdate {
    /// Builds an update where an empty string means "no change".
    pub fn from_fields(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: non_empty(title.into()),
            content: non_empty(content.into()),
        }
    }

    /// Returns whether this update would leave title and content unchanged.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Validation errors for entry invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyId,
    UpdatedBeforeCreated {
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "entry id cannot be empty"),
            Self::UpdatedBeforeCreated { created, updated } => write!(
                f,
                "entry updated ({}) must not be earlier than created ({})",
                updated.to_rfc3339(),
                created.to_rfc3339()
            ),
        }
    }
}

impl Error for EntryValidationError {}

impl Entry {
    /// Creates a new entry with a generated id and `created == updated == now`.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, content, now())
    }

    /// Creates an entry with a caller-provided id and creation time.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: impl Into<EntryId>,
        title: impl Into<String>,
        content: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        let created = created.trunc_subsecs(3);
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            created,
            updated: created,
        }
    }

    /// Applies a field-level update and refreshes `updated`.
    ///
    /// `updated` always moves forward by at least one millisecond, even when
    /// `at` falls inside the same millisecond as the previous write.
    pub fn apply_update(&mut self, update: &EntryUpdate, at: DateTime<Utc>) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }

        let at = at.trunc_subsecs(3);
        let floor = self.updated + Duration::milliseconds(1);
        self.updated = if at > floor { at } else { floor };
    }

    /// Validates entry invariants before persistence or after loading.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.trim().is_empty() {
            return Err(EntryValidationError::EmptyId);
        }
        if self.updated < self.created {
            return Err(EntryValidationError::UpdatedBeforeCreated {
                created: self.created,
                updated: self.updated,
            });
        }
        Ok(())
    }
}

/// Current UTC time truncated to millisecond precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
