//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage calls into use-case level APIs.
//! - Keep CLI/HTTP layers decoupled from storage details.

pub mod journal;
