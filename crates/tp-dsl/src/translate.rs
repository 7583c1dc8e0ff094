//! Device code translation.
//!
//! The stored `code` column is either a JSON manifest or textual ThingTalk;
//! this module reconstructs the requested wire shape per request. The one
//! fast path (textual code, default language, ThingTalk accept) returns
//! the stored text without a parse/print round trip.

use std::sync::LazyLock;

use regex::Regex;
use tp_core::entities::{DeviceCode, SchemaRow};
use tp_core::enums::AcceptFormat;
use tp_core::i18n::DEFAULT_LANGUAGE;

use crate::{DslError, DslToolkit};

static JSON_HEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\{").unwrap());

/// Whether stored code is a JSON manifest rather than textual ThingTalk.
#[must_use]
pub fn is_json_code(code: &str) -> bool {
    JSON_HEAD.is_match(code)
}

/// A translated device-code response.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeResponse {
    /// Textual ThingTalk.
    ThingTalk(String),
    /// JSON manifest, `developer` flag included.
    Manifest(serde_json::Value),
}

/// Translate stored device code into the negotiated response shape.
///
/// `metadata` carries the localized schema row for non-default languages;
/// callers pass `None` for the default language.
///
/// # Errors
///
/// Returns `DslError` if the stored manifest is invalid JSON or the toolkit
/// rejects the code.
pub fn translate_device_code(
    toolkit: &dyn DslToolkit,
    dev: &DeviceCode,
    accept: AcceptFormat,
    language: &str,
    metadata: Option<&SchemaRow>,
) -> Result<CodeResponse, DslError> {
    let is_json = is_json_code(&dev.code);

    let mut manifest = None;
    let code = if is_json {
        let mut parsed: serde_json::Value = serde_json::from_str(&dev.code)?;
        parsed["version"] = serde_json::Value::from(dev.version);
        let code = toolkit.class_from_manifest(&dev.primary_kind, &parsed)?;
        manifest = Some(parsed);
        code
    } else {
        dev.code.clone()
    };

    // fast path without parsing the code
    if language == DEFAULT_LANGUAGE && accept == AcceptFormat::ThingTalk {
        return Ok(CodeResponse::ThingTalk(code));
    }

    let code = match metadata {
        Some(meta) if language != DEFAULT_LANGUAGE => toolkit.merge_class_metadata(&code, meta)?,
        _ => code,
    };

    match accept {
        AcceptFormat::Json | AcceptFormat::JsonV1 => {
            let mut manifest = match manifest {
                Some(manifest) => manifest,
                None => toolkit.class_to_manifest(&code)?,
            };
            let developer = dev.approved_version != Some(dev.version);
            manifest["developer"] = serde_json::Value::Bool(developer);
            Ok(CodeResponse::Manifest(manifest))
        }
        AcceptFormat::ThingTalk => Ok(CodeResponse::ThingTalk(toolkit.prettyprint_class(&code)?)),
    }
}
