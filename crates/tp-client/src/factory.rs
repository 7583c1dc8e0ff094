//! Factory resolution.
//!
//! Devices carry a cached factory JSON column; when it is absent the
//! factory is derived from the stored manifest's auth section. Builtin
//! devices have no factory at all.

use tp_core::entities::DeviceWithCode;
use tp_core::factory::{FactoryDescriptor, FormField};

use crate::ClientError;

const BUILTIN_MODULE: &str = "org.thingpedia.builtin";

/// Resolve the factory of one device: cached JSON when present, otherwise
/// derived from the manifest. `None` means the device takes no factory.
///
/// # Errors
///
/// Returns `ClientError` if the cached factory or the stored code is not
/// valid JSON, or the manifest's auth type is unknown.
pub(crate) fn ensure_device_factory(
    device: &DeviceWithCode,
) -> Result<Option<FactoryDescriptor>, ClientError> {
    if let Some(raw) = &device.factory {
        return Ok(Some(serde_json::from_str(raw)?));
    }

    let manifest: serde_json::Value = serde_json::from_str(&device.code)?;
    if manifest["module_type"].as_str() == Some(BUILTIN_MODULE) {
        return Ok(None);
    }

    let kind = device.primary_kind.clone();
    let text = device.name.clone();
    let auth_type = manifest["auth"]["type"].as_str().unwrap_or("none");
    let factory = match auth_type {
        "none" => FactoryDescriptor::None { kind, text },
        "oauth2" | "custom_oauth" => FactoryDescriptor::OAuth2 { kind, text },
        "interactive" => FactoryDescriptor::Interactive { kind, text },
        "discovery" => FactoryDescriptor::Discovery {
            kind,
            text,
            discovery_type: manifest["auth"]["discoveryType"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        },
        "basic" => FactoryDescriptor::Form {
            kind,
            text,
            fields: vec![
                FormField {
                    name: "username".to_string(),
                    label: "Username".to_string(),
                    field_type: "text".to_string(),
                },
                FormField {
                    name: "password".to_string(),
                    label: "Password".to_string(),
                    field_type: "password".to_string(),
                },
            ],
        },
        other => {
            return Err(ClientError::BadRequest(format!(
                "Unknown auth type '{other}' for {}",
                device.primary_kind
            )));
        }
    };
    Ok(Some(factory))
}
