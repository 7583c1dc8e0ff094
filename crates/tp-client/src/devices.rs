//! Device operations: module location, code fetch, listings, search,
//! factories, and setup resolution.

use std::collections::HashMap;

use tracing::warn;

use tp_core::entities::{DeviceListing, DeviceWithCode, ModuleLocation};
use tp_core::enums::{AcceptFormat, CategoryFilter};
use tp_core::factory::FactoryDescriptor;
use tp_core::i18n::DEFAULT_LANGUAGE;
use tp_db::repos::{device, schema};
use tp_dsl::translate::{CodeResponse, translate_device_code};

use crate::factory::ensure_device_factory;
use crate::{ClientError, ThingpediaClient};

impl ThingpediaClient {
    /// Resolve where a device's packaged module can be downloaded from.
    ///
    /// The served version defaults to the highest one visible to the
    /// caller; requesting a higher version is `Forbidden`, requesting a
    /// non-downloadable device is `BadRequest`.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown kinds, plus the taxonomy above.
    pub async fn get_module_location(
        &self,
        kind: &str,
        version: Option<i64>,
    ) -> Result<ModuleLocation, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        let dev = device::get_download_version(&conn, kind, scope)
            .await?
            .ok_or(ClientError::NotFound)?;
        if !dev.downloadable {
            return Err(ClientError::BadRequest("No Code Available".to_string()));
        }

        let Some(max_version) = dev.version else {
            return Err(ClientError::Forbidden("Not Authorized".to_string()));
        };
        if version.is_some_and(|v| v > max_version) {
            return Err(ClientError::Forbidden("Not Authorized".to_string()));
        }
        let version = version.unwrap_or(max_version);
        let developer = dev.approved_version.is_none_or(|approved| version > approved);

        Ok(ModuleLocation {
            url: format!(
                "{}/devices/{kind}-v{version}.zip",
                self.cdn_host.trim_end_matches('/')
            ),
            developer,
        })
    }

    /// Fetch a device's code in the negotiated format.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or invisible kinds; translation errors
    /// propagate.
    pub async fn get_device_code(
        &self,
        kind: &str,
        accept: AcceptFormat,
    ) -> Result<CodeResponse, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        let dev = device::get_full_code_by_primary_kind(&conn, kind, scope)
            .await?
            .ok_or(ClientError::NotFound)?;

        let metadata = if self.language == DEFAULT_LANGUAGE {
            None
        } else {
            schema::get_metas_by_kinds(&conn, &[kind.to_string()], scope, &self.language)
                .await?
                .into_iter()
                .next()
        };

        Ok(translate_device_code(
            self.toolkit.as_ref(),
            &dev,
            accept,
            &self.language,
            metadata.as_ref(),
        )?)
    }

    /// Paginated device listing, optionally filtered by category.
    ///
    /// Fetches `page_size + 1` rows so the caller can detect a next page.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a `class` value outside both category sets.
    pub async fn get_device_list(
        &self,
        class: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<DeviceListing>, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        let offset = page * page_size;
        let limit = page_size + 1;

        let rows = match class {
            None => device::get_all_approved(&conn, scope, offset, limit).await?,
            Some(class) => {
                let filter = CategoryFilter::parse(class)
                    .map_err(|e| ClientError::BadRequest(e.to_string()))?;
                match filter {
                    CategoryFilter::Category(cat) => {
                        device::get_by_category(&conn, cat, scope, offset, limit).await?
                    }
                    CategoryFilter::Subcategory(sub) => {
                        device::get_by_subcategory(&conn, sub, scope, offset, limit).await?
                    }
                }
            }
        };
        Ok(rows)
    }

    /// Full-text device search.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_device_search(&self, q: &str) -> Result<Vec<DeviceListing>, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;
        Ok(device::get_by_fuzzy_search(&conn, q, scope).await?)
    }

    /// List the factories of every visible device, optionally filtered by
    /// category. Devices whose factory fails to resolve are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a `class` value outside both category sets.
    pub async fn get_device_factories(
        &self,
        class: Option<&str>,
    ) -> Result<Vec<FactoryDescriptor>, ClientError> {
        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;

        let devices = match class {
            None => device::get_all_approved_with_code(&conn, scope).await?,
            Some(class) => {
                let filter = CategoryFilter::parse(class)
                    .map_err(|e| ClientError::BadRequest(e.to_string()))?;
                match filter {
                    CategoryFilter::Category(cat) => {
                        device::get_by_category_with_code(&conn, cat, scope).await?
                    }
                    CategoryFilter::Subcategory(sub) => {
                        device::get_by_subcategory_with_code(&conn, sub, scope).await?
                    }
                }
            }
        };

        let mut factories = Vec::new();
        for dev in &devices {
            if let Some(factory) = resolve_factory(dev) {
                factories.push(factory);
            }
        }
        Ok(factories)
    }

    /// Resolve the setup factory for each requested logical kind.
    ///
    /// The `messaging` pseudo-kind maps to the configured messaging device
    /// and its result appears under both keys. Several devices serving one
    /// kind collapse into a `multiple` choice; kinds with no usable device
    /// get an empty one.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the query fails.
    pub async fn get_device_setup(
        &self,
        kinds: &[String],
    ) -> Result<HashMap<String, FactoryDescriptor>, ClientError> {
        if kinds.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.connect()?;
        let scope = self.scope(&conn).await?;

        let kinds: Vec<String> = kinds
            .iter()
            .map(|k| {
                if k == "messaging" {
                    self.messaging_device.clone()
                } else {
                    k.clone()
                }
            })
            .collect();

        let candidates = device::get_devices_for_setup(&conn, &kinds, scope).await?;
        let mut result: HashMap<String, FactoryDescriptor> = HashMap::new();
        for candidate in candidates {
            let Some(factory) = resolve_factory(&candidate.device) else {
                continue;
            };
            match result.get_mut(&candidate.for_kind) {
                Some(FactoryDescriptor::Multiple { choices }) => choices.push(factory.clone()),
                Some(existing) => {
                    let first = existing.clone();
                    *existing = FactoryDescriptor::Multiple {
                        choices: vec![first, factory.clone()],
                    };
                }
                None => {
                    result.insert(candidate.for_kind.clone(), factory.clone());
                }
            }
            if candidate.for_kind == self.messaging_device {
                result.insert("messaging".to_string(), factory);
            }
        }

        for kind in kinds {
            result.entry(kind).or_insert_with(FactoryDescriptor::empty);
        }
        Ok(result)
    }

    /// Alias kept for clients still calling the older name.
    ///
    /// # Errors
    ///
    /// See [`get_device_setup`](Self::get_device_setup).
    pub async fn get_device_setup2(
        &self,
        kinds: &[String],
    ) -> Result<HashMap<String, FactoryDescriptor>, ClientError> {
        self.get_device_setup(kinds).await
    }
}

fn resolve_factory(device: &DeviceWithCode) -> Option<FactoryDescriptor> {
    match ensure_device_factory(device) {
        Ok(factory) => factory,
        Err(error) => {
            warn!(kind = %device.primary_kind, %error, "skipping device with unresolvable factory");
            None
        }
    }
}
