//! Deterministic [`DslToolkit`] stand-in for tests.
//!
//! The real toolkit is the external ThingTalk parser; tests across the
//! workspace need predictable textual behavior without it. `FakeToolkit`
//! implements every method with simple string rules that preserve the
//! shapes the translation layers depend on.

use std::sync::LazyLock;

use regex::Regex;
use tp_core::entities::SchemaRow;

use crate::{DslError, DslToolkit};

static KIND_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([a-zA-Z0-9_.-]+)").unwrap());
static DATASET_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^dataset @\S+ \{ (?s:(.*)) \}$").unwrap());
static EXAMPLE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(stream|query|action)\s*(\(.*?\))?\s*:=\s*(?s:(.*))$").unwrap()
});

/// A pure-string `DslToolkit` for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeToolkit;

impl DslToolkit for FakeToolkit {
    fn class_from_manifest(
        &self,
        kind: &str,
        _manifest: &serde_json::Value,
    ) -> Result<String, DslError> {
        Ok(format!("class @{kind} {{}}"))
    }

    fn class_to_manifest(&self, code: &str) -> Result<serde_json::Value, DslError> {
        let kind = KIND_REF
            .captures(code)
            .and_then(|c| c.get(1))
            .ok_or_else(|| DslError::Parse(format!("no class reference in: {code}")))?
            .as_str();
        Ok(serde_json::json!({
            "kind": kind,
            "module_type": "org.thingpedia.v2",
        }))
    }

    fn prettyprint_class(&self, code: &str) -> Result<String, DslError> {
        if !code.contains('@') {
            return Err(DslError::Parse(format!("not a class: {code}")));
        }
        Ok(code.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn merge_class_metadata(&self, code: &str, meta: &SchemaRow) -> Result<String, DslError> {
        Ok(format!("{} #_[localized={}]", code.trim_end(), meta.kind))
    }

    fn schemas_to_class_block(
        &self,
        rows: &[SchemaRow],
        with_metadata: bool,
    ) -> Result<String, DslError> {
        let mut out = String::new();
        for row in rows {
            if with_metadata {
                out.push_str(&format!("class @{} {{}} #_[localized={}]\n", row.kind, row.kind));
            } else {
                out.push_str(&format!("class @{} {{}}\n", row.kind));
            }
        }
        Ok(out)
    }

    fn dataset_example_to_declaration(&self, dataset: &str) -> Result<String, DslError> {
        let inner = DATASET_WRAPPER
            .captures(dataset)
            .and_then(|c| c.get(1))
            .ok_or_else(|| DslError::Parse(format!("not a dataset: {dataset}")))?
            .as_str();
        let caps = EXAMPLE_HEAD
            .captures(inner)
            .ok_or_else(|| DslError::Parse(format!("not an example: {inner}")))?;
        let keyword = caps.get(1).map_or("", |m| m.as_str());
        let args = caps.get(2).map_or("", |m| m.as_str());
        let body = caps.get(3).map_or("", |m| m.as_str());
        Ok(format!("let {keyword} x{args} := {body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn manifest_round_trip_keeps_kind() {
        let toolkit = FakeToolkit;
        let code = toolkit
            .class_from_manifest("com.twitter", &serde_json::json!({}))
            .unwrap();
        let manifest = toolkit.class_to_manifest(&code).unwrap();
        assert_eq!(manifest["kind"], "com.twitter");
    }

    #[test]
    fn prettyprint_rejects_non_class_text() {
        let toolkit = FakeToolkit;
        assert!(toolkit.prettyprint_class("not a class").is_err());
    }

    #[test]
    fn declaration_keeps_parameter_list() {
        let toolkit = FakeToolkit;
        let out = toolkit
            .dataset_example_to_declaration(
                "dataset @foo { action (p : String) := @a.b(x=p); }",
            )
            .unwrap();
        assert_eq!(out, "let action x(p : String) := @a.b(x=p);");
    }
}
