//! Device repository: version lookup, scoped listings, setup and discovery
//! queries.
//!
//! List queries take `offset`/`limit` verbatim; the pagination over-fetch
//! (requesting one row beyond the page size) is the caller's contract, not
//! this layer's.

use tp_core::entities::{
    DeviceCode, DeviceListing, DeviceSummary, DeviceWithCode, DiscoveryService, DownloadVersion,
    SetupCandidate,
};
use tp_core::enums::{DeviceCategory, DeviceSubcategory};
use tp_core::scope::AccessScope;

use crate::error::DatabaseError;
use crate::helpers::{fts_quote, get_bool, get_opt_string, placeholders, scope_params};

const LISTING_COLUMNS: &str = "d.primary_kind, d.name, d.description, d.category, d.subcategory";

fn row_to_listing(row: &libsql::Row) -> Result<DeviceListing, DatabaseError> {
    Ok(DeviceListing {
        primary_kind: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        description: row.get::<String>(2)?,
        category: row.get::<String>(3)?,
        subcategory: row.get::<String>(4)?,
    })
}

fn row_to_with_code(row: &libsql::Row) -> Result<DeviceWithCode, DatabaseError> {
    Ok(DeviceWithCode {
        primary_kind: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        code: row.get::<String>(2)?,
        factory: get_opt_string(row, 3)?,
    })
}

fn row_to_summary(row: &libsql::Row) -> Result<DeviceSummary, DatabaseError> {
    Ok(DeviceSummary {
        id: row.get::<i64>(0)?,
        primary_kind: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
    })
}

/// Fetch the downloadability and max visible version of a device.
///
/// Owners and admins see the current development version; everyone else
/// sees the approved version (which may be absent).
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_download_version(
    conn: &libsql::Connection,
    kind: &str,
    scope: AccessScope,
) -> Result<Option<DownloadVersion>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let mut rows = conn
        .query(
            "SELECT downloadable, approved_version,
                    CASE WHEN (?2 = 1 OR owner = ?3) THEN version ELSE approved_version END
             FROM devices WHERE primary_kind = ?1",
            libsql::params![kind, admin, org],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(DownloadVersion {
            downloadable: get_bool(&row, 0)?,
            approved_version: row.get::<Option<i64>>(1)?,
            version: row.get::<Option<i64>>(2)?,
        })),
        None => Ok(None),
    }
}

/// Fetch the stored code of a device by primary kind, scoped.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_full_code_by_primary_kind(
    conn: &libsql::Connection,
    kind: &str,
    scope: AccessScope,
) -> Result<Option<DeviceCode>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let mut rows = conn
        .query(
            "SELECT primary_kind, version, approved_version, code
             FROM devices
             WHERE primary_kind = ?1
               AND (?2 = 1 OR approved_version IS NOT NULL OR owner = ?3)",
            libsql::params![kind, admin, org],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(DeviceCode {
            primary_kind: row.get::<String>(0)?,
            version: row.get::<i64>(1)?,
            approved_version: row.get::<Option<i64>>(2)?,
            code: row.get::<String>(3)?,
        })),
        None => Ok(None),
    }
}

async fn collect_listings(mut rows: libsql::Rows) -> Result<Vec<DeviceListing>, DatabaseError> {
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_listing(&row)?);
    }
    Ok(results)
}

async fn collect_with_code(mut rows: libsql::Rows) -> Result<Vec<DeviceWithCode>, DatabaseError> {
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_with_code(&row)?);
    }
    Ok(results)
}

/// List devices in a primary category, scoped and paginated.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_category(
    conn: &libsql::Connection,
    category: DeviceCategory,
    scope: AccessScope,
    offset: i64,
    limit: i64,
) -> Result<Vec<DeviceListing>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            &format!(
                "SELECT {LISTING_COLUMNS} FROM devices d
                 WHERE d.category = ?1
                   AND (?2 = 1 OR d.approved_version IS NOT NULL OR d.owner = ?3)
                 ORDER BY d.name LIMIT ?4 OFFSET ?5"
            ),
            libsql::params![category.as_str(), admin, org, limit, offset],
        )
        .await?;
    collect_listings(rows).await
}

/// List devices in a secondary category, scoped and paginated.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_subcategory(
    conn: &libsql::Connection,
    subcategory: DeviceSubcategory,
    scope: AccessScope,
    offset: i64,
    limit: i64,
) -> Result<Vec<DeviceListing>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            &format!(
                "SELECT {LISTING_COLUMNS} FROM devices d
                 WHERE d.subcategory = ?1
                   AND (?2 = 1 OR d.approved_version IS NOT NULL OR d.owner = ?3)
                 ORDER BY d.name LIMIT ?4 OFFSET ?5"
            ),
            libsql::params![subcategory.as_str(), admin, org, limit, offset],
        )
        .await?;
    collect_listings(rows).await
}

/// List all devices visible to the caller, paginated.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_all_approved(
    conn: &libsql::Connection,
    scope: AccessScope,
    offset: i64,
    limit: i64,
) -> Result<Vec<DeviceListing>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            &format!(
                "SELECT {LISTING_COLUMNS} FROM devices d
                 WHERE (?1 = 1 OR d.approved_version IS NOT NULL OR d.owner = ?2)
                 ORDER BY d.name LIMIT ?3 OFFSET ?4"
            ),
            libsql::params![admin, org, limit, offset],
        )
        .await?;
    collect_listings(rows).await
}

/// Like [`get_by_category`], with code and cached factory included.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_category_with_code(
    conn: &libsql::Connection,
    category: DeviceCategory,
    scope: AccessScope,
) -> Result<Vec<DeviceWithCode>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            "SELECT d.primary_kind, d.name, d.code, d.factory FROM devices d
             WHERE d.category = ?1
               AND (?2 = 1 OR d.approved_version IS NOT NULL OR d.owner = ?3)
             ORDER BY d.name",
            libsql::params![category.as_str(), admin, org],
        )
        .await?;
    collect_with_code(rows).await
}

/// Like [`get_by_subcategory`], with code and cached factory included.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_subcategory_with_code(
    conn: &libsql::Connection,
    subcategory: DeviceSubcategory,
    scope: AccessScope,
) -> Result<Vec<DeviceWithCode>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            "SELECT d.primary_kind, d.name, d.code, d.factory FROM devices d
             WHERE d.subcategory = ?1
               AND (?2 = 1 OR d.approved_version IS NOT NULL OR d.owner = ?3)
             ORDER BY d.name",
            libsql::params![subcategory.as_str(), admin, org],
        )
        .await?;
    collect_with_code(rows).await
}

/// Like [`get_all_approved`], with code and cached factory included.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_all_approved_with_code(
    conn: &libsql::Connection,
    scope: AccessScope,
) -> Result<Vec<DeviceWithCode>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            "SELECT d.primary_kind, d.name, d.code, d.factory FROM devices d
             WHERE (?1 = 1 OR d.approved_version IS NOT NULL OR d.owner = ?2)
             ORDER BY d.name",
            libsql::params![admin, org],
        )
        .await?;
    collect_with_code(rows).await
}

/// Full-text device search over kind, name, and description.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_fuzzy_search(
    conn: &libsql::Connection,
    q: &str,
    scope: AccessScope,
) -> Result<Vec<DeviceListing>, DatabaseError> {
    let quoted = fts_quote(q);
    if quoted.is_empty() {
        return Ok(Vec::new());
    }
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            &format!(
                "SELECT {LISTING_COLUMNS}
                 FROM devices_fts
                 JOIN devices d ON d.id = devices_fts.rowid
                 WHERE devices_fts MATCH ?1
                   AND (?2 = 1 OR d.approved_version IS NOT NULL OR d.owner = ?3)
                 ORDER BY rank"
            ),
            libsql::params![quoted, admin, org],
        )
        .await?;
    collect_listings(rows).await
}

/// Fetch the devices serving each requested logical kind, tagged with the
/// kind they were requested under.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_devices_for_setup(
    conn: &libsql::Connection,
    kinds: &[String],
    scope: AccessScope,
) -> Result<Vec<SetupCandidate>, DatabaseError> {
    if kinds.is_empty() {
        return Ok(Vec::new());
    }

    let (admin, org) = scope_params(scope);
    let sql = format!(
        "SELECT dk.kind, d.primary_kind, d.name, d.code, d.factory
         FROM device_kinds dk
         JOIN devices d ON d.id = dk.device_id
         WHERE dk.kind IN ({})
           AND (?1 = 1 OR d.approved_version IS NOT NULL OR d.owner = ?2)
         ORDER BY dk.kind, d.name",
        placeholders(kinds.len(), 3)
    );
    let mut params: Vec<libsql::Value> =
        vec![libsql::Value::Integer(admin), libsql::Value::Integer(org)];
    params.extend(kinds.iter().map(|k| libsql::Value::Text(k.clone())));

    let mut rows = conn.query(&sql, params).await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(SetupCandidate {
            for_kind: row.get::<String>(0)?,
            device: DeviceWithCode {
                primary_kind: row.get::<String>(1)?,
                name: row.get::<String>(2)?,
                code: row.get::<String>(3)?,
                factory: get_opt_string(&row, 4)?,
            },
        });
    }
    Ok(results)
}

/// Look up a device by its primary kind (discovery adapter).
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_primary_kind(
    conn: &libsql::Connection,
    kind: &str,
) -> Result<Option<DeviceSummary>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, primary_kind, name FROM devices WHERE primary_kind = ?1",
            [kind],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_summary(&row)?)),
        None => Ok(None),
    }
}

/// Look up devices by any logical kind (discovery adapter).
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_any_kind(
    conn: &libsql::Connection,
    kind: &str,
) -> Result<Vec<DeviceSummary>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT DISTINCT d.id, d.primary_kind, d.name
             FROM devices d
             JOIN device_kinds dk ON dk.device_id = d.id
             WHERE dk.kind = ?1
             ORDER BY d.primary_kind",
            [kind],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_summary(&row)?);
    }
    Ok(results)
}

/// Look up devices advertising a (discovery protocol, service id) pair.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_discovery_service(
    conn: &libsql::Connection,
    discovery_type: &str,
    service: &str,
) -> Result<Vec<DeviceSummary>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT d.id, d.primary_kind, d.name
             FROM devices d
             JOIN device_discovery_services s ON s.device_id = d.id
             WHERE s.discovery_type = ?1 AND s.service = ?2
             ORDER BY d.primary_kind",
            libsql::params![discovery_type, service],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_summary(&row)?);
    }
    Ok(results)
}

/// Enumerate the discovery services a device advertises.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_all_discovery_services(
    conn: &libsql::Connection,
    device_id: i64,
) -> Result<Vec<DiscoveryService>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT discovery_type, service FROM device_discovery_services
             WHERE device_id = ?1 ORDER BY discovery_type, service",
            [device_id],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(DiscoveryService {
            discovery_type: row.get::<String>(0)?,
            service: row.get::<String>(1)?,
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{seed_device, seed_org, test_db};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn download_version_anonymous_sees_approved() {
        let db = test_db().await;
        let org = seed_org(db.conn(), "k", false).await;
        seed_device(
            db.conn(),
            "com.example.dev",
            Some(org),
            "online",
            "service",
            3,
            Some(2),
            true,
            "class @com.example.dev {}",
        )
        .await;

        let dv = get_download_version(db.conn(), "com.example.dev", AccessScope::Anonymous)
            .await
            .unwrap()
            .unwrap();
        assert!(dv.downloadable);
        assert_eq!(dv.version, Some(2));
        assert_eq!(dv.approved_version, Some(2));

        let dv = get_download_version(db.conn(), "com.example.dev", AccessScope::Organization(org))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dv.version, Some(3));
    }

    #[tokio::test]
    async fn download_version_unapproved_hidden_from_others() {
        let db = test_db().await;
        let org = seed_org(db.conn(), "k", false).await;
        seed_device(
            db.conn(),
            "com.example.wip",
            Some(org),
            "online",
            "service",
            1,
            None,
            true,
            "{}",
        )
        .await;

        let dv = get_download_version(db.conn(), "com.example.wip", AccessScope::Anonymous)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dv.version, None);

        let dv = get_download_version(db.conn(), "com.example.wip", AccessScope::Admin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dv.version, Some(1));
    }

    #[tokio::test]
    async fn full_code_respects_scope() {
        let db = test_db().await;
        let org = seed_org(db.conn(), "k", false).await;
        seed_device(
            db.conn(),
            "com.example.wip",
            Some(org),
            "online",
            "service",
            1,
            None,
            false,
            "class @com.example.wip {}",
        )
        .await;

        assert!(
            get_full_code_by_primary_kind(db.conn(), "com.example.wip", AccessScope::Anonymous)
                .await
                .unwrap()
                .is_none()
        );
        let dev = get_full_code_by_primary_kind(
            db.conn(),
            "com.example.wip",
            AccessScope::Organization(org),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(dev.code, "class @com.example.wip {}");
    }

    #[tokio::test]
    async fn category_listing_paginates() {
        let db = test_db().await;
        for i in 0..5 {
            seed_device(
                db.conn(),
                &format!("com.example.d{i}"),
                None,
                "online",
                "service",
                0,
                Some(0),
                false,
                "{}",
            )
            .await;
        }

        let page = get_by_category(
            db.conn(),
            DeviceCategory::Online,
            AccessScope::Anonymous,
            0,
            3,
        )
        .await
        .unwrap();
        assert_eq!(page.len(), 3);

        let page = get_by_category(
            db.conn(),
            DeviceCategory::Online,
            AccessScope::Anonymous,
            3,
            3,
        )
        .await
        .unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn fuzzy_search_matches_description() {
        let db = test_db().await;
        seed_device(
            db.conn(),
            "com.example.weather",
            None,
            "data",
            "service",
            0,
            Some(0),
            false,
            "{}",
        )
        .await;

        let hits = get_by_fuzzy_search(db.conn(), "weather", AccessScope::Anonymous)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].primary_kind, "com.example.weather");

        let hits = get_by_fuzzy_search(db.conn(), "com.example.weather", AccessScope::Anonymous)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn setup_query_reports_for_kind() {
        let db = test_db().await;
        let id = seed_device(
            db.conn(),
            "com.example.tv",
            None,
            "physical",
            "home",
            0,
            Some(0),
            false,
            "{}",
        )
        .await;
        db.conn()
            .execute(
                "INSERT INTO device_kinds (device_id, kind) VALUES (?1, 'tv')",
                [id],
            )
            .await
            .unwrap();

        let candidates = get_devices_for_setup(
            db.conn(),
            &["tv".to_string(), "unmapped".to_string()],
            AccessScope::Anonymous,
        )
        .await
        .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].for_kind, "tv");
        assert_eq!(candidates[0].device.primary_kind, "com.example.tv");
    }

    #[tokio::test]
    async fn discovery_services_roundtrip() {
        let db = test_db().await;
        let id = seed_device(
            db.conn(),
            "com.example.bulb",
            None,
            "physical",
            "home",
            0,
            Some(0),
            false,
            "{}",
        )
        .await;
        db.conn()
            .execute(
                "INSERT INTO device_discovery_services (device_id, discovery_type, service)
                 VALUES (?1, 'bluetooth', '00-11-22'), (?1, 'upnp', 'urn:bulb')",
                [id],
            )
            .await
            .unwrap();

        let services = get_all_discovery_services(db.conn(), id).await.unwrap();
        assert_eq!(services.len(), 2);

        let devices = get_by_discovery_service(db.conn(), "bluetooth", "00-11-22")
            .await
            .unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].primary_kind, "com.example.bulb");
    }
}
