use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Storage-shaped string set row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StringTypeRow {
    pub type_name: String,
    pub name: String,
    pub license: String,
    pub attribution: String,
}

/// Public shape of a string set in enumeration responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StringTypeListing {
    #[serde(rename = "type")]
    pub string_type: String,
    pub name: String,
    pub license: String,
    pub attribution: String,
}

impl From<StringTypeRow> for StringTypeListing {
    fn from(row: StringTypeRow) -> Self {
        Self {
            string_type: row.type_name,
            name: row.name,
            license: row.license,
            attribution: row.attribution,
        }
    }
}
