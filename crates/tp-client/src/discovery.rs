//! Discovery protocol adapter.
//!
//! The discovery protocol server itself is external; it decodes a raw
//! advertisement into a kind through [`DiscoveryDecoder`] and performs its
//! lookups against [`DiscoveryDatabase`].

use std::sync::Arc;

use async_trait::async_trait;
use tp_core::entities::{DeviceSummary, DiscoveryService};
use tp_db::TpDb;
use tp_db::repos::device;

use crate::{ClientError, ThingpediaClient};

/// The external discovery protocol server, consumed via interface only.
#[async_trait]
pub trait DiscoveryDecoder: Send + Sync {
    /// Decode a raw discovery advertisement into a device kind.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the body cannot be decoded.
    async fn decode(&self, body: &serde_json::Value) -> Result<String, ClientError>;
}

/// The lookup interface the discovery server consumes.
pub struct DiscoveryDatabase {
    db: Arc<TpDb>,
}

impl DiscoveryDatabase {
    /// Create an adapter over the catalog database.
    #[must_use]
    pub fn new(db: Arc<TpDb>) -> Self {
        Self { db }
    }

    /// Devices advertising a (protocol, service id) pair.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_by_discovery_service(
        &self,
        discovery_type: &str,
        service: &str,
    ) -> Result<Vec<DeviceSummary>, ClientError> {
        let conn = self.db.connect()?;
        Ok(device::get_by_discovery_service(&conn, discovery_type, service).await?)
    }

    /// The discovery services one device advertises.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_all_discovery_services(
        &self,
        device_id: i64,
    ) -> Result<Vec<DiscoveryService>, ClientError> {
        let conn = self.db.connect()?;
        Ok(device::get_all_discovery_services(&conn, device_id).await?)
    }

    /// Devices serving a logical kind.
    ///
    /// `bluetooth-` and `upnp-` prefixed kinds are older aliases for a
    /// discovery service lookup and are routed there.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_by_any_kind(&self, kind: &str) -> Result<Vec<DeviceSummary>, ClientError> {
        if let Some(service) = kind.strip_prefix("bluetooth-") {
            return self.get_by_discovery_service("bluetooth", service).await;
        }
        if let Some(service) = kind.strip_prefix("upnp-") {
            return self.get_by_discovery_service("upnp", service).await;
        }
        let conn = self.db.connect()?;
        Ok(device::get_by_any_kind(&conn, kind).await?)
    }

    /// The discovery kinds of one device, concatenated protocol + service.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_all_kinds(&self, device_id: i64) -> Result<Vec<String>, ClientError> {
        let services = self.get_all_discovery_services(device_id).await?;
        Ok(services
            .into_iter()
            .map(|s| format!("{}{}", s.discovery_type, s.service))
            .collect())
    }

    /// One device by primary kind.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_by_primary_kind(
        &self,
        kind: &str,
    ) -> Result<Option<DeviceSummary>, ClientError> {
        let conn = self.db.connect()?;
        Ok(device::get_by_primary_kind(&conn, kind).await?)
    }
}

impl ThingpediaClient {
    /// Decode a discovery advertisement into a device kind.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the decoder rejects the body.
    pub async fn get_kind_by_discovery(
        &self,
        body: &serde_json::Value,
    ) -> Result<String, ClientError> {
        self.discovery.decode(body).await
    }
}
