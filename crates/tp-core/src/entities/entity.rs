use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Storage-shaped entity type row (column names as stored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityTypeRow {
    pub id: String,
    pub name: String,
    pub is_well_known: bool,
    pub has_ner_support: bool,
}

/// Public shape of an entity type in enumeration responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityTypeListing {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
    pub is_well_known: bool,
    pub has_ner_support: bool,
}

impl From<EntityTypeRow> for EntityTypeListing {
    fn from(row: EntityTypeRow) -> Self {
        Self {
            entity_type: row.id,
            name: row.name,
            is_well_known: row.is_well_known,
            has_ner_support: row.has_ner_support,
        }
    }
}

/// Storage-shaped named-entity value row from the lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityValueRow {
    pub entity_id: String,
    pub entity_value: String,
    pub entity_canonical: String,
    pub entity_name: String,
}

/// Public shape of one matched entity value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityMatch {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub value: String,
    pub canonical: String,
    pub name: String,
}

impl From<EntityValueRow> for EntityMatch {
    fn from(row: EntityValueRow) -> Self {
        Self {
            entity_type: row.entity_id,
            value: row.entity_value,
            canonical: row.entity_canonical,
            name: row.entity_name,
        }
    }
}

/// Metadata attached to an entity lookup response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityMeta {
    pub name: String,
    pub has_ner_support: bool,
    pub is_well_known: bool,
}

/// Matched rows plus type metadata, returned as a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityLookupResult {
    pub data: Vec<EntityMatch>,
    pub meta: EntityMeta,
}
