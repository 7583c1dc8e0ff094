//! Client error taxonomy.
//!
//! The three named variants are the API-visible outcomes; everything else
//! propagates transparently from the layer that failed.

use thiserror::Error;
use tp_db::error::DatabaseError;
use tp_dsl::DslError;

/// Errors surfaced by [`ThingpediaClient`](crate::ThingpediaClient)
/// operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The requested device, schema, or entity does not exist (or is not
    /// visible to the caller).
    #[error("Not Found")]
    NotFound,

    /// The caller is not authorized for the requested version or resource.
    #[error("{0}")]
    Forbidden(String),

    /// The request itself is invalid.
    #[error("{0}")]
    BadRequest(String),

    /// Database layer failure.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// ThingTalk translation failure.
    #[error(transparent)]
    Dsl(#[from] DslError),

    /// Geocoding request failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON reshaping failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
