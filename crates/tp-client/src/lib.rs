//! # tp-client
//!
//! The Thingpedia data-access client.
//!
//! [`ThingpediaClient`] is instantiated per request with the caller's
//! developer key and locale, resolves the key to an access scope once,
//! and serves every catalog operation: device code and module location,
//! schema batches, example search, device setup and factories, discovery,
//! entity and location lookup. External collaborators (the ThingTalk
//! toolkit, the discovery protocol decoder, the geocoder) are consumed
//! through traits; [`rpc`] exposes the operation set to the control
//! socket as a name-dispatched JSON surface.

pub mod devices;
pub mod discovery;
pub mod error;
pub mod examples;
pub mod factory;
pub mod lookup;
pub mod rpc;
pub mod schemas;

#[cfg(test)]
pub(crate) mod test_support;

pub use discovery::{DiscoveryDatabase, DiscoveryDecoder};
pub use error::ClientError;
pub use lookup::{LocationResolver, NominatimResolver};
pub use rpc::RPC_METHODS;

use std::sync::Arc;

use tp_config::PlatformConfig;
use tp_core::i18n::locale_to_language;
use tp_core::scope::AccessScope;
use tp_db::TpDb;
use tp_db::repos::organization;
use tp_dsl::DslToolkit;

/// Per-request Thingpedia client.
///
/// Cheap to construct; holds shared handles only. The language is derived
/// from the locale once, at construction.
pub struct ThingpediaClient {
    developer_key: Option<String>,
    locale: String,
    language: String,
    db: Arc<TpDb>,
    toolkit: Arc<dyn DslToolkit>,
    discovery: Arc<dyn DiscoveryDecoder>,
    locations: Arc<dyn LocationResolver>,
    cdn_host: String,
    messaging_device: String,
}

impl ThingpediaClient {
    /// Create a client for one caller.
    #[must_use]
    pub fn new(
        db: Arc<TpDb>,
        toolkit: Arc<dyn DslToolkit>,
        discovery: Arc<dyn DiscoveryDecoder>,
        locations: Arc<dyn LocationResolver>,
        platform: &PlatformConfig,
        developer_key: Option<String>,
        locale: &str,
    ) -> Self {
        Self {
            developer_key,
            locale: locale.to_string(),
            language: locale_to_language(locale),
            db,
            toolkit,
            discovery,
            locations,
            cdn_host: platform.cdn_host.clone(),
            messaging_device: platform.messaging_device.clone(),
        }
    }

    /// The developer key this client was constructed with.
    #[must_use]
    pub fn developer_key(&self) -> Option<&str> {
        self.developer_key.as_deref()
    }

    /// The caller's locale.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The language derived from the locale.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    pub(crate) fn connect(&self) -> Result<libsql::Connection, ClientError> {
        Ok(self.db.connect()?)
    }

    /// Resolve the developer key to an access scope on this connection.
    pub(crate) async fn scope(
        &self,
        conn: &libsql::Connection,
    ) -> Result<AccessScope, ClientError> {
        let org = organization::get_by_developer_key(conn, self.developer_key.as_deref()).await?;
        Ok(AccessScope::from_org(org.as_ref()))
    }
}
