//! String-set repository.

use tp_core::entities::StringTypeRow;

use crate::error::DatabaseError;

/// Enumerate all string sets in one language.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_all(
    conn: &libsql::Connection,
    language: &str,
) -> Result<Vec<StringTypeRow>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT type_name, name, license, attribution
             FROM string_types WHERE language = ?1 ORDER BY type_name",
            [language],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(StringTypeRow {
            type_name: row.get::<String>(0)?,
            name: row.get::<String>(1)?,
            license: row.get::<String>(2)?,
            attribution: row.get::<String>(3)?,
        });
    }
    Ok(results)
}
