//! Batch schema fetch with format translation.

use serde::Serialize;
use tp_core::enums::AcceptFormat;
use tp_db::repos::schema;

use crate::{ClientError, ThingpediaClient};

/// A batch schema response in the negotiated format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemasResponse {
    /// JSON object keyed by kind.
    Json(serde_json::Value),
    /// Combined pretty-printed class block.
    ThingTalk(String),
}

impl ThingpediaClient {
    /// Fetch the signatures (and optionally localized metadata) of a batch
    /// of kinds. An empty kind list short-circuits to an empty object.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query or the class rendering fails.
    pub async fn get_schemas(
        &self,
        kinds: &[String],
        with_metadata: bool,
        accept: AcceptFormat,
    ) -> Result<SchemasResponse, ClientError> {
        if kinds.is_empty() {
            return Ok(SchemasResponse::Json(serde_json::json!({})));
        }

        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        let rows = if with_metadata {
            schema::get_metas_by_kinds(&conn, kinds, scope, &self.language).await?
        } else {
            schema::get_types_and_names_by_kinds(&conn, kinds, scope).await?
        };

        match accept {
            AcceptFormat::Json | AcceptFormat::JsonV1 => {
                let mut obj = serde_json::Map::new();
                for row in rows {
                    obj.insert(
                        row.kind.clone(),
                        serde_json::json!({
                            "kind_type": row.kind_type,
                            "triggers": row.triggers,
                            "actions": row.actions,
                            "queries": row.queries,
                        }),
                    );
                }
                Ok(SchemasResponse::Json(serde_json::Value::Object(obj)))
            }
            AcceptFormat::ThingTalk => {
                let block = self.toolkit.schemas_to_class_block(&rows, with_metadata)?;
                Ok(SchemasResponse::ThingTalk(block))
            }
        }
    }
}
