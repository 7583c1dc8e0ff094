//! # tp-dsl
//!
//! The ThingTalk seam for Thingpedia Cloud.
//!
//! The grammar, AST, and printer of the domain language belong to the
//! external ThingTalk toolkit; this crate consumes them through the
//! [`DslToolkit`] trait and builds the three translation layers on top:
//!
//! - [`translate`]: stored device code → JSON manifest or pretty text
//! - [`compat`]: backward-compatibility rewriting of stored example rows
//! - [`dataset`]: synthesized dataset blocks with deterministic names
//!
//! Everything here is pure text/AST transformation with no I/O.

pub mod compat;
pub mod dataset;
pub mod test_support;
pub mod translate;

use thiserror::Error;
use tp_core::entities::SchemaRow;

/// Errors from DSL translation.
#[derive(Debug, Error)]
pub enum DslError {
    /// The external toolkit rejected the input.
    #[error("parse error: {0}")]
    Parse(String),

    /// Stored code claimed to be a JSON manifest but is not valid JSON.
    #[error("invalid manifest: {0}")]
    InvalidManifest(#[from] serde_json::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The external ThingTalk parser/printer, consumed via interface only.
///
/// Every method works at the string/JSON boundary so the toolkit's AST
/// never leaks into this repository. Implementations must be pure: same
/// input, same output, no side effects.
pub trait DslToolkit: Send + Sync {
    /// Convert a JSON manifest into class-definition source text.
    ///
    /// # Errors
    ///
    /// Returns `DslError::Parse` if the manifest does not describe a valid class.
    fn class_from_manifest(
        &self,
        kind: &str,
        manifest: &serde_json::Value,
    ) -> Result<String, DslError>;

    /// Convert class-definition source text into a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns `DslError::Parse` if the code does not parse.
    fn class_to_manifest(&self, code: &str) -> Result<serde_json::Value, DslError>;

    /// Parse and pretty-print class-definition source text.
    ///
    /// # Errors
    ///
    /// Returns `DslError::Parse` if the code does not parse.
    fn prettyprint_class(&self, code: &str) -> Result<String, DslError>;

    /// Merge localized metadata (canonical names, descriptions) into a class
    /// definition and return the merged source text.
    ///
    /// # Errors
    ///
    /// Returns `DslError::Parse` if the code does not parse.
    fn merge_class_metadata(&self, code: &str, meta: &SchemaRow) -> Result<String, DslError>;

    /// Render a batch of schema rows as one combined class-definition block.
    ///
    /// # Errors
    ///
    /// Returns `DslError::Parse` if a row's signatures are malformed.
    fn schemas_to_class_block(
        &self,
        rows: &[SchemaRow],
        with_metadata: bool,
    ) -> Result<String, DslError>;

    /// Parse a one-off dataset (a single wrapped example) and reduce it to a
    /// named `let` declaration statement, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns `DslError::Parse` if the dataset does not parse.
    fn dataset_example_to_declaration(&self, dataset: &str) -> Result<String, DslError>;
}
