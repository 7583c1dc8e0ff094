//! Entity structs for all Thingpedia Cloud domain objects.
//!
//! Storage-shaped structs map one-to-one to tp-db query projections; the
//! public (wire) shapes live next to them where the client reshapes rows
//! before returning them. All structs derive `Serialize`, `Deserialize`,
//! and `JsonSchema`.

mod device;
mod entity;
mod example;
mod location;
mod organization;
mod schema;
mod strings;

pub use device::{
    DeviceCode, DeviceListing, DeviceSummary, DeviceWithCode, DiscoveryService, DownloadVersion,
    ModuleLocation, SetupCandidate,
};
pub use entity::{EntityLookupResult, EntityMatch, EntityMeta, EntityTypeListing, EntityTypeRow, EntityValueRow};
pub use example::ExampleRow;
pub use location::LocationCandidate;
pub use organization::Organization;
pub use schema::{DeviceName, SchemaRow};
pub use strings::{StringTypeListing, StringTypeRow};
