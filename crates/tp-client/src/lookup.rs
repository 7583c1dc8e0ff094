//! Entity, location, and enumeration lookups.

use async_trait::async_trait;
use serde::Deserialize;
use tp_core::entities::{
    DeviceName, EntityLookupResult, EntityMatch, EntityMeta, EntityTypeListing, LocationCandidate,
    SchemaRow, StringTypeListing,
};
use tp_db::error::DatabaseError;
use tp_db::repos::{entity, schema, strings};

use crate::{ClientError, ThingpediaClient};

/// The external geocoding service, consumed via interface only.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Resolve a free-form place name to ranked candidates.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the resolution fails.
    async fn resolve(
        &self,
        locale: &str,
        term: &str,
    ) -> Result<Vec<LocationCandidate>, ClientError>;
}

/// Thin HTTP resolver against a Nominatim-compatible endpoint.
pub struct NominatimResolver {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    importance: f64,
}

impl NominatimResolver {
    /// Create a resolver against `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl LocationResolver for NominatimResolver {
    async fn resolve(
        &self,
        locale: &str,
        term: &str,
    ) -> Result<Vec<LocationCandidate>, ClientError> {
        let url = format!(
            "{}/search?format=jsonv2&accept-language={}&limit=5&q={}",
            self.base_url,
            urlencoding::encode(locale),
            urlencoding::encode(term)
        );
        let places: Vec<NominatimPlace> = self.http.get(&url).send().await?.json().await?;
        let candidates = places
            .into_iter()
            .filter_map(|p| {
                let latitude = p.lat.parse().ok()?;
                let longitude = p.lon.parse().ok()?;
                Some(LocationCandidate {
                    latitude,
                    longitude,
                    display: p.display_name,
                    rank: p.importance,
                })
            })
            .collect();
        Ok(candidates)
    }
}

impl ThingpediaClient {
    /// Search named-entity values of one type, with the type's metadata.
    ///
    /// # Errors
    ///
    /// `NotFound` if the entity type does not exist.
    pub async fn lookup_entity(
        &self,
        entity_type: &str,
        search_term: &str,
    ) -> Result<EntityLookupResult, ClientError> {
        let conn = self.connect()?;
        let rows = entity::lookup_with_type(&conn, &self.language, entity_type, search_term).await?;
        let meta = match entity::get(&conn, entity_type, &self.language).await {
            Ok(meta) => meta,
            Err(DatabaseError::NoResult) => return Err(ClientError::NotFound),
            Err(e) => return Err(e.into()),
        };

        Ok(EntityLookupResult {
            data: rows.into_iter().map(EntityMatch::from).collect(),
            meta: EntityMeta {
                name: meta.name,
                has_ner_support: meta.has_ner_support,
                is_well_known: meta.is_well_known,
            },
        })
    }

    /// Resolve a free-form place name, keyed by the caller's locale.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the resolver fails.
    pub async fn lookup_location(
        &self,
        search_term: &str,
    ) -> Result<Vec<LocationCandidate>, ClientError> {
        self.locations.resolve(&self.locale, search_term).await
    }

    /// Enumerate every visible kind with its canonical name.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_all_device_names(&self) -> Result<Vec<DeviceName>, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        Ok(schema::get_all_approved(&conn, scope).await?)
    }

    /// Snapshot of every visible schema, signatures only or with localized
    /// metadata.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_snapshot(&self, with_metadata: bool) -> Result<Vec<SchemaRow>, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        let rows = if with_metadata {
            schema::get_current_snapshot_meta(&conn, scope, &self.language).await?
        } else {
            schema::get_current_snapshot_types(&conn, scope).await?
        };
        Ok(rows)
    }

    /// Enumerate all entity types.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_all_entity_types(&self) -> Result<Vec<EntityTypeListing>, ClientError> {
        let conn = self.connect()?;
        let rows = entity::get_all(&conn).await?;
        Ok(rows.into_iter().map(EntityTypeListing::from).collect())
    }

    /// Enumerate all string sets in the caller's language.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_all_strings(&self) -> Result<Vec<StringTypeListing>, ClientError> {
        let conn = self.connect()?;
        let rows = strings::get_all(&conn, &self.language).await?;
        Ok(rows.into_iter().map(StringTypeListing::from).collect())
    }
}
