//! Cross-cutting error types for Thingpedia Cloud.
//!
//! Domain-specific errors (`DatabaseError`, `DslError`, `StorageError`,
//! `TrainingError`) are defined in their respective crates. The client-facing
//! taxonomy (`NotFound` / `Forbidden` / `BadRequest`) converges in tp-client.

use thiserror::Error;

/// A `class` query parameter outside the two fixed category sets.
///
/// Mapped to `BadRequest` at the client boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid class parameter: {0}")]
pub struct InvalidCategory(pub String);
