//! Example fetch with per-format shaping: rewritten rows for the JSON
//! dialects, a synthesized dataset block for ThingTalk.

use serde::Serialize;
use tp_core::entities::ExampleRow;
use tp_core::enums::AcceptFormat;
use tp_db::repos::example;
use tp_dsl::{compat, dataset};

use crate::{ClientError, ThingpediaClient};

/// An example response in the negotiated format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExamplesResponse {
    /// Rewritten rows, for the JSON dialects.
    Rows(Vec<ExampleRow>),
    /// A synthesized `dataset` block.
    Dataset(String),
}

impl ThingpediaClient {
    fn shape_examples(
        &self,
        mut rows: Vec<ExampleRow>,
        accept: AcceptFormat,
        dataset_name: &str,
    ) -> Result<ExamplesResponse, ClientError> {
        match accept {
            AcceptFormat::JsonV1 => {
                compat::rewrite_examples(self.toolkit.as_ref(), &mut rows, true)?;
                Ok(ExamplesResponse::Rows(rows))
            }
            AcceptFormat::Json => {
                compat::rewrite_examples(self.toolkit.as_ref(), &mut rows, false)?;
                Ok(ExamplesResponse::Rows(rows))
            }
            AcceptFormat::ThingTalk => Ok(ExamplesResponse::Dataset(
                dataset::examples_to_dataset(dataset_name, &self.language, &rows),
            )),
        }
    }

    /// Keyword search over example utterances.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query or the rewriting fails.
    pub async fn get_examples_by_key(
        &self,
        key: &str,
        accept: AcceptFormat,
    ) -> Result<ExamplesResponse, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        let rows = example::get_by_key(&conn, key, scope, &self.language).await?;
        self.shape_examples(rows, accept, &dataset::name_for_key(key))
    }

    /// Batch example fetch by owning kinds.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query or the rewriting fails.
    pub async fn get_examples_by_kinds(
        &self,
        kinds: &[String],
        accept: AcceptFormat,
    ) -> Result<ExamplesResponse, ClientError> {
        if kinds.is_empty() {
            return Ok(ExamplesResponse::Rows(Vec::new()));
        }
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        let rows = example::get_by_kinds(&conn, kinds, scope, &self.language).await?;
        self.shape_examples(rows, accept, &dataset::name_for_kinds(kinds))
    }

    /// All base examples in the caller's language.
    ///
    /// The legacy v1 dialect was never served here; anything but
    /// `application/json` gets the dataset block.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query or the rewriting fails.
    pub async fn get_all_examples(
        &self,
        accept: AcceptFormat,
    ) -> Result<ExamplesResponse, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        let mut rows = example::get_base_by_language(&conn, scope, &self.language).await?;
        match accept {
            AcceptFormat::Json => {
                compat::rewrite_examples(self.toolkit.as_ref(), &mut rows, false)?;
                Ok(ExamplesResponse::Rows(rows))
            }
            AcceptFormat::ThingTalk | AcceptFormat::JsonV1 => Ok(ExamplesResponse::Dataset(
                dataset::examples_to_dataset(&dataset::name_for_everything(), &self.language, &rows),
            )),
        }
    }

    /// Record one click on an example.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the update fails.
    pub async fn click_example(&self, example_id: i64) -> Result<(), ClientError> {
        let conn = self.connect()?;
        Ok(example::click(&conn, example_id).await?)
    }
}
