//! Example repository: keyword and kind lookups, click tracking.

use tp_core::entities::ExampleRow;
use tp_core::scope::AccessScope;

use crate::error::DatabaseError;
use crate::helpers::{fts_quote, get_opt_string, placeholders, scope_params};

const EXAMPLE_COLUMNS: &str =
    "e.id, e.language, e.utterance, e.target_code, e.click_count, e.name";

fn row_to_example(row: &libsql::Row) -> Result<ExampleRow, DatabaseError> {
    Ok(ExampleRow {
        id: row.get::<i64>(0)?,
        language: row.get::<String>(1)?,
        utterance: row.get::<String>(2)?,
        target_code: row.get::<String>(3)?,
        click_count: row.get::<i64>(4)?,
        name: get_opt_string(row, 5)?,
    })
}

async fn collect_examples(mut rows: libsql::Rows) -> Result<Vec<ExampleRow>, DatabaseError> {
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_example(&row)?);
    }
    Ok(results)
}

/// Keyword search over example utterances in one language.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_key(
    conn: &libsql::Connection,
    key: &str,
    scope: AccessScope,
    language: &str,
) -> Result<Vec<ExampleRow>, DatabaseError> {
    let quoted = fts_quote(key);
    if quoted.is_empty() {
        return Ok(Vec::new());
    }
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            &format!(
                "SELECT {EXAMPLE_COLUMNS}
                 FROM examples_fts
                 JOIN examples e ON e.id = examples_fts.rowid
                 LEFT JOIN device_schemas s ON s.id = e.schema_id
                 WHERE examples_fts MATCH ?1
                   AND e.language = ?2
                   AND (s.id IS NULL OR ?3 = 1 OR s.approved_version IS NOT NULL OR s.owner = ?4)
                 ORDER BY rank"
            ),
            libsql::params![quoted, language, admin, org],
        )
        .await?;
    collect_examples(rows).await
}

/// Batch example lookup by owning kinds, in one language.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_kinds(
    conn: &libsql::Connection,
    kinds: &[String],
    scope: AccessScope,
    language: &str,
) -> Result<Vec<ExampleRow>, DatabaseError> {
    if kinds.is_empty() {
        return Ok(Vec::new());
    }
    let (admin, org) = scope_params(scope);
    let sql = format!(
        "SELECT {EXAMPLE_COLUMNS}
         FROM examples e
         JOIN device_schemas s ON s.id = e.schema_id
         WHERE s.kind IN ({})
           AND e.language = ?3
           AND (?1 = 1 OR s.approved_version IS NOT NULL OR s.owner = ?2)
         ORDER BY e.id",
        placeholders(kinds.len(), 4)
    );
    let mut params: Vec<libsql::Value> = vec![
        libsql::Value::Integer(admin),
        libsql::Value::Integer(org),
        libsql::Value::Text(language.to_string()),
    ];
    params.extend(kinds.iter().map(|k| libsql::Value::Text(k.clone())));
    let rows = conn.query(&sql, params).await?;
    collect_examples(rows).await
}

/// All base examples in one language (dataset export).
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_base_by_language(
    conn: &libsql::Connection,
    scope: AccessScope,
    language: &str,
) -> Result<Vec<ExampleRow>, DatabaseError> {
    let (admin, org) = scope_params(scope);
    let rows = conn
        .query(
            &format!(
                "SELECT {EXAMPLE_COLUMNS}
                 FROM examples e
                 LEFT JOIN device_schemas s ON s.id = e.schema_id
                 WHERE e.is_base = 1
                   AND e.language = ?1
                   AND (s.id IS NULL OR ?2 = 1 OR s.approved_version IS NOT NULL OR s.owner = ?3)
                 ORDER BY e.id"
            ),
            libsql::params![language, admin, org],
        )
        .await?;
    collect_examples(rows).await
}

/// Record one click on an example.
///
/// # Errors
///
/// Returns `DatabaseError` if the update fails.
pub async fn click(conn: &libsql::Connection, example_id: i64) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE examples SET click_count = click_count + 1 WHERE id = ?1",
        [example_id],
    )
    .await?;
    Ok(())
}
