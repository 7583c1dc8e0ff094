use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One schema row: the structural description of a device's capabilities,
/// with or without localized metadata depending on the query that produced it.
///
/// `triggers`, `queries` and `actions` are JSON objects keyed by function
/// name; their internal shape belongs to the ThingTalk toolkit and is carried
/// opaquely here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaRow {
    pub kind: String,
    pub kind_type: String,
    pub triggers: serde_json::Value,
    pub queries: serde_json::Value,
    pub actions: serde_json::Value,
}

/// Device-name enumeration row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceName {
    pub kind: String,
    pub kind_canonical: String,
}
