//! Schema repository: type signatures, localized metadata, enumeration.
//!
//! The `types` column carries signatures only; `device_schema_metadata`
//! carries the per-language natural-language metadata. Metadata queries
//! fall back to the bare signatures when no row exists for the requested
//! language.

use tp_core::entities::{DeviceName, SchemaRow};
use tp_core::scope::AccessScope;

use crate::error::DatabaseError;
use crate::helpers::{get_json, placeholders, scope_params};

fn row_to_schema(row: &libsql::Row) -> Result<SchemaRow, DatabaseError> {
    let body = get_json(row, 2)?;
    let section = |key: &str| {
        body.get(key)
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()))
    };
    Ok(SchemaRow {
        kind: row.get::<String>(0)?,
        kind_type: row.get::<String>(1)?,
        triggers: section("triggers"),
        queries: section("queries"),
        actions: section("actions"),
    })
}

async fn collect_schemas(mut rows: libsql::Rows) -> Result<Vec<SchemaRow>, DatabaseError> {
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_schema(&row)?);
    }
    Ok(results)
}

fn kinds_params(admin: i64, org: i64, kinds: &[String]) -> Vec<libsql::Value> {
    let mut params: Vec<libsql::Value> =
        vec![libsql::Value::Integer(admin), libsql::Value::Integer(org)];
    params.extend(kinds.iter().map(|k| libsql::Value::Text(k.clone())));
    params
}

/// Batch type-only schema lookup by kind list.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_types_and_names_by_kinds(
    conn: &libsql::Connection,
    kinds: &[String],
    scope: AccessScope,
) -> Result<Vec<SchemaRow>, DatabaseError> {
    if kinds.is_empty() {
        return Ok(Vec::new());
    }
    let (admin, org) = scope_params(scope);
    let sql = format!(
        "SELECT s.kind, s.kind_type, s.types
         FROM device_schemas s
         WHERE s.kind IN ({})
           AND (?1 = 1 OR s.approved_version IS NOT NULL OR s.owner = ?2)
         ORDER BY s.kind",
        placeholders(kinds.len(), 3)
    );
    let rows = conn.query(&sql, kinds_params(admin, org, kinds)).await?;
    collect_schemas(rows).await
}

/// Batch metadata-inclusive schema lookup by kind list and language.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_metas_by_kinds(
    conn: &libsql::Connection,
    kinds: &[String],
    scope: AccessScope,
    language: &str,
) -> Result<Vec<SchemaRow>, DatabaseError> {
    if kinds.is_empty() {
        return Ok(Vec::new());
    }
    let (admin, org) = scope_params(scope);
    let sql = format!(
        "SELECT s.kind, s.kind_type, COALESCE(m.metas, s.types)
         FROM device_schemas s
         LEFT JOIN device_schema_metadata m
           ON m.schema_id = s.id AND m.language = ?3
         WHERE s.kind IN ({})
           AND (?1 = 1 OR s.approved_version IS NOT NULL OR s.owner = ?2)
         ORDER BY s.kind",
        placeholders(kinds.len(), 4)
    );
    let mut params: Vec<libsql::Value> = vec![
        libsql::Value::Integer(admin),
        libsql::Value::Integer(org),
        libsql::Value::Text(language.to_string()),
    ];
    params.extend(kinds.iter().map(|k| libsql::Value::Text(k.clone())));
    let rows = conn.query(&sql, params).await?;
    collect_schemas(rows).await
}

/// Enumerate the kinds visible to the caller, with canonical names.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_all_approved(
    conn: &libsql::Connection,
    scope: AccessScope,
) -> Result<Vec<DeviceName>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let mut rows = conn
        .query(
            "SELECT kind, kind_canonical FROM device_schemas
             WHERE (?1 = 1 OR approved_version IS NOT NULL OR owner = ?2)
             ORDER BY kind",
            libsql::params![admin, org],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(DeviceName {
            kind: row.get::<String>(0)?,
            kind_canonical: row.get::<String>(1)?,
        });
    }
    Ok(results)
}

/// Snapshot of every visible schema, signatures only.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_current_snapshot_types(
    conn: &libsql::Connection,
    scope: AccessScope,
) -> Result<Vec<SchemaRow>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            "SELECT s.kind, s.kind_type, s.types
             FROM device_schemas s
             WHERE (?1 = 1 OR s.approved_version IS NOT NULL OR s.owner = ?2)
             ORDER BY s.kind",
            libsql::params![admin, org],
        )
        .await?;
    collect_schemas(rows).await
}

/// Snapshot of every visible schema with localized metadata.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_current_snapshot_meta(
    conn: &libsql::Connection,
    scope: AccessScope,
    language: &str,
) -> Result<Vec<SchemaRow>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            "SELECT s.kind, s.kind_type, COALESCE(m.metas, s.types)
             FROM device_schemas s
             LEFT JOIN device_schema_metadata m
               ON m.schema_id = s.id AND m.language = ?3
             WHERE (?1 = 1 OR s.approved_version IS NOT NULL OR s.owner = ?2)
             ORDER BY s.kind",
            libsql::params![admin, org, language],
        )
        .await?;
    collect_schemas(rows).await
}
