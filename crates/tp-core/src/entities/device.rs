use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Version and downloadability of a device, as seen by one caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DownloadVersion {
    pub downloadable: bool,
    /// Max version visible to the caller's scope. `None` when the device has
    /// no version the caller may download.
    pub version: Option<i64>,
    pub approved_version: Option<i64>,
}

/// Where to download a device's packaged module from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleLocation {
    pub url: String,
    /// True when the served version is newer than the approved one.
    pub developer: bool,
}

/// The stored source of a device: either a JSON manifest or ThingTalk text.
///
/// The raw `code` column is the only persisted form; every richer
/// representation is reconstructed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceCode {
    pub primary_kind: String,
    pub version: i64,
    pub approved_version: Option<i64>,
    pub code: String,
}

/// Projection used by device list and search responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceListing {
    pub primary_kind: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
}

/// Input to factory resolution: the code plus the cached factory, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceWithCode {
    pub primary_kind: String,
    pub name: String,
    pub code: String,
    /// Cached factory JSON, computed once and stored; `None` until then.
    pub factory: Option<String>,
}

/// One device matched during setup resolution, tagged with the logical kind
/// it was requested under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SetupCandidate {
    pub for_kind: String,
    pub device: DeviceWithCode,
}

/// Minimal device projection used by the discovery database adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceSummary {
    pub id: i64,
    pub primary_kind: String,
    pub name: String,
}

/// One (discovery protocol, service id) pair advertised by a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiscoveryService {
    pub discovery_type: String,
    pub service: String,
}
