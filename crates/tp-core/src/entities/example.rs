use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stored usage example.
///
/// `target_code` is mutated in place by the backward-compatibility rewriter
/// before the row is returned or wrapped into a dataset; `name` is internal
/// and always cleared on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExampleRow {
    pub id: i64,
    pub language: String,
    pub utterance: String,
    pub target_code: String,
    pub click_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
