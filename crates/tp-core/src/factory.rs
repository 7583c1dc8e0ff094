//! Device factory descriptors.
//!
//! A factory tells a client how to instantiate and configure a device:
//! a credentials form, an OAuth redirect, local discovery, nothing at all,
//! or a choice between several concrete devices serving the same logical
//! kind. Stored factories are cached JSON; computed ones are derived from
//! the device's class definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One input field of a `form` factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// How a client should instantiate/configure a device.
///
/// Tagged by the `type` field on the wire, matching the stored JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FactoryDescriptor {
    /// Configured with no user input.
    None { kind: String, text: String },
    /// Configured through a credentials form.
    Form {
        kind: String,
        text: String,
        fields: Vec<FormField>,
    },
    /// Configured through an OAuth 2.0 redirect flow.
    OAuth2 { kind: String, text: String },
    /// Configured through an interactive dialog.
    Interactive { kind: String, text: String },
    /// Configured by discovering the device on the local network.
    Discovery {
        kind: String,
        text: String,
        #[serde(rename = "discoveryType")]
        discovery_type: String,
    },
    /// Several devices serve the requested kind; the client must choose.
    Multiple { choices: Vec<FactoryDescriptor> },
}

impl FactoryDescriptor {
    /// An empty multiple-choice descriptor, the default for unmapped kinds.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Multiple {
            choices: Vec::new(),
        }
    }

    /// Whether this is a `multiple` descriptor.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple { .. })
    }
}
