//! Journal domain model.
//!
//! # Responsibility
//! - Define the canonical entry record shared by CLI, HTTP and storage layers.
//! - Own the self-mutation rule used by partial updates.
//!
//! # Invariants
//! - Every entry is identified by an opaque id assigned at creation.
//! - Deletion is permanent; there is no tombstone state.

pub mod entry;
