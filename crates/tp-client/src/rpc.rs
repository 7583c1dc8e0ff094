//! Control-socket RPC surface.
//!
//! The frontend exposes the client to other processes as name-dispatched
//! JSON calls. [`RPC_METHODS`] is the closed allowlist; anything outside
//! it, and the methods this deployment does not serve, is a `BadRequest`.

use serde_json::Value;
use tp_core::enums::AcceptFormat;
use tp_dsl::translate::CodeResponse;

use crate::examples::ExamplesResponse;
use crate::schemas::SchemasResponse;
use crate::{ClientError, ThingpediaClient};

/// Every method name the control socket accepts.
pub const RPC_METHODS: &[&str] = &[
    "getAppCode",
    "getApps",
    "getModuleLocation",
    "getDeviceCode",
    "getSchemas",
    "getMixins",
    "getDeviceSetup",
    "getDeviceSetup2",
    "getDeviceFactories",
    "getDeviceList",
    "getDeviceSearch",
    "getKindByDiscovery",
    "getExamplesByKinds",
    "getExamplesByKey",
    "clickExample",
    "lookupEntity",
    "lookupLocation",
];

fn param<'a>(params: &'a [Value], idx: usize, method: &str) -> Result<&'a Value, ClientError> {
    params
        .get(idx)
        .ok_or_else(|| ClientError::BadRequest(format!("{method}: missing parameter {idx}")))
}

fn param_str<'a>(params: &'a [Value], idx: usize, method: &str) -> Result<&'a str, ClientError> {
    param(params, idx, method)?
        .as_str()
        .ok_or_else(|| ClientError::BadRequest(format!("{method}: parameter {idx} must be a string")))
}

fn param_i64(params: &[Value], idx: usize, method: &str) -> Result<i64, ClientError> {
    param(params, idx, method)?
        .as_i64()
        .ok_or_else(|| ClientError::BadRequest(format!("{method}: parameter {idx} must be an integer")))
}

fn param_str_list(params: &[Value], idx: usize, method: &str) -> Result<Vec<String>, ClientError> {
    match params.get(idx) {
        // a bare string is accepted as a one-element list
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str().map(String::from).ok_or_else(|| {
                    ClientError::BadRequest(format!("{method}: parameter {idx} must be strings"))
                })
            })
            .collect(),
        _ => Err(ClientError::BadRequest(format!(
            "{method}: parameter {idx} must be a string list"
        ))),
    }
}

fn opt_str(params: &[Value], idx: usize) -> Option<&str> {
    params.get(idx).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn opt_version(params: &[Value], idx: usize) -> Option<i64> {
    match params.get(idx) {
        Some(Value::Number(n)) => n.as_i64(),
        // older callers pass the version as a (possibly empty) string
        Some(Value::String(s)) if !s.is_empty() => s.parse().ok(),
        _ => None,
    }
}

fn accept_at(params: &[Value], idx: usize) -> AcceptFormat {
    opt_str(params, idx).map_or_else(AcceptFormat::default, AcceptFormat::parse)
}

fn code_to_value(code: CodeResponse) -> Value {
    match code {
        CodeResponse::ThingTalk(text) => Value::String(text),
        CodeResponse::Manifest(manifest) => manifest,
    }
}

fn examples_to_value(out: ExamplesResponse) -> Result<Value, ClientError> {
    match out {
        ExamplesResponse::Rows(rows) => Ok(serde_json::to_value(rows)?),
        ExamplesResponse::Dataset(block) => Ok(Value::String(block)),
    }
}

impl ThingpediaClient {
    /// Dispatch one RPC call by method name.
    ///
    /// # Errors
    ///
    /// `BadRequest` for unknown or unsupported methods and malformed
    /// parameters; otherwise whatever the operation returns.
    pub async fn dispatch_rpc(
        &self,
        method: &str,
        params: &[Value],
    ) -> Result<Value, ClientError> {
        if !RPC_METHODS.contains(&method) {
            return Err(ClientError::BadRequest(format!("Unknown method {method}")));
        }

        match method {
            // legacy app-store and mixin methods; this deployment serves none
            "getAppCode" | "getApps" | "getMixins" => Err(ClientError::BadRequest(format!(
                "Unsupported method {method}"
            ))),
            "getModuleLocation" => {
                let kind = param_str(params, 0, method)?;
                let location = self
                    .get_module_location(kind, opt_version(params, 1))
                    .await?;
                Ok(serde_json::to_value(location)?)
            }
            "getDeviceCode" => {
                let kind = param_str(params, 0, method)?;
                let code = self.get_device_code(kind, accept_at(params, 1)).await?;
                Ok(code_to_value(code))
            }
            "getSchemas" => {
                let kinds = param_str_list(params, 0, method)?;
                let with_metadata = params.get(1).and_then(Value::as_bool).unwrap_or(false);
                let out = self
                    .get_schemas(&kinds, with_metadata, accept_at(params, 2))
                    .await?;
                match out {
                    SchemasResponse::Json(obj) => Ok(obj),
                    SchemasResponse::ThingTalk(block) => Ok(Value::String(block)),
                }
            }
            "getDeviceSetup" | "getDeviceSetup2" => {
                let kinds = param_str_list(params, 0, method)?;
                let setup = self.get_device_setup(&kinds).await?;
                Ok(serde_json::to_value(setup)?)
            }
            "getDeviceFactories" => {
                let factories = self.get_device_factories(opt_str(params, 0)).await?;
                Ok(serde_json::to_value(factories)?)
            }
            "getDeviceList" => {
                let class = opt_str(params, 0);
                let page = param_i64(params, 1, method)?;
                let page_size = param_i64(params, 2, method)?;
                let listings = self.get_device_list(class, page, page_size).await?;
                Ok(serde_json::to_value(listings)?)
            }
            "getDeviceSearch" => {
                let q = param_str(params, 0, method)?;
                Ok(serde_json::to_value(self.get_device_search(q).await?)?)
            }
            "getKindByDiscovery" => {
                let body = param(params, 0, method)?;
                Ok(Value::String(self.get_kind_by_discovery(body).await?))
            }
            "getExamplesByKinds" => {
                let kinds = param_str_list(params, 0, method)?;
                let out = self
                    .get_examples_by_kinds(&kinds, accept_at(params, 1))
                    .await?;
                examples_to_value(out)
            }
            "getExamplesByKey" => {
                let key = param_str(params, 0, method)?;
                let out = self.get_examples_by_key(key, accept_at(params, 1)).await?;
                examples_to_value(out)
            }
            "clickExample" => {
                self.click_example(param_i64(params, 0, method)?).await?;
                Ok(Value::Null)
            }
            "lookupEntity" => {
                let entity_type = param_str(params, 0, method)?;
                let term = param_str(params, 1, method)?;
                let out = self.lookup_entity(entity_type, term).await?;
                Ok(serde_json::to_value(out)?)
            }
            "lookupLocation" => {
                let term = param_str(params, 0, method)?;
                let out = self.lookup_location(term).await?;
                Ok(serde_json::to_value(out)?)
            }
            _ => unreachable!("method gated by RPC_METHODS"),
        }
    }
}
