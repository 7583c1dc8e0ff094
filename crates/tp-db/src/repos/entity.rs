//! Entity repository: named-entity type metadata and value lookup.

use tp_core::entities::{EntityTypeRow, EntityValueRow};

use crate::error::DatabaseError;
use crate::helpers::get_bool;

fn row_to_type(row: &libsql::Row) -> Result<EntityTypeRow, DatabaseError> {
    Ok(EntityTypeRow {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        is_well_known: get_bool(row, 2)?,
        has_ner_support: get_bool(row, 3)?,
    })
}

/// Search entity values of one type by canonical substring or exact value.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn lookup_with_type(
    conn: &libsql::Connection,
    language: &str,
    entity_type: &str,
    search_term: &str,
) -> Result<Vec<EntityValueRow>, DatabaseError> {
    let needle = format!("%{}%", search_term.to_lowercase());
    let mut rows = conn
        .query(
            "SELECT entity_id, entity_value, entity_canonical, entity_name
             FROM entity_lexicon
             WHERE language = ?1 AND entity_id = ?2
               AND (entity_canonical LIKE ?3 OR entity_value = ?4)
             ORDER BY entity_canonical",
            libsql::params![language, entity_type, needle, search_term],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(EntityValueRow {
            entity_id: row.get::<String>(0)?,
            entity_value: row.get::<String>(1)?,
            entity_canonical: row.get::<String>(2)?,
            entity_name: row.get::<String>(3)?,
        });
    }
    Ok(results)
}

/// Fetch the metadata row of one entity type in one language.
///
/// # Errors
///
/// Returns `DatabaseError::NoResult` if the entity type does not exist.
pub async fn get(
    conn: &libsql::Connection,
    entity_type: &str,
    language: &str,
) -> Result<EntityTypeRow, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, name, is_well_known, has_ner_support
             FROM entity_names WHERE id = ?1 AND language = ?2",
            libsql::params![entity_type, language],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_type(&row)
}

/// Enumerate all entity types (default-language rows).
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_all(conn: &libsql::Connection) -> Result<Vec<EntityTypeRow>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, name, is_well_known, has_ner_support
             FROM entity_names WHERE language = 'en' ORDER BY id",
            (),
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_type(&row)?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_db;
    use pretty_assertions::assert_eq;

    async fn seed_entities(conn: &libsql::Connection) {
        conn.execute(
            "INSERT INTO entity_names (id, language, name, is_well_known, has_ner_support)
             VALUES ('tt:stock_id', 'en', 'Company Stock ID', 0, 1),
                    ('tt:country', 'en', 'Country', 1, 1)",
            (),
        )
        .await
        .unwrap();
        conn.execute(
            "INSERT INTO entity_lexicon (language, entity_id, entity_value, entity_canonical, entity_name)
             VALUES ('en', 'tt:stock_id', 'goog', 'alphabet inc.', 'Alphabet Inc.'),
                    ('en', 'tt:stock_id', 'msft', 'microsoft corp.', 'Microsoft Corp.')",
            (),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn lookup_matches_canonical_substring() {
        let db = test_db().await;
        seed_entities(db.conn()).await;

        let rows = lookup_with_type(db.conn(), "en", "tt:stock_id", "alphabet")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity_value, "goog");
    }

    #[tokio::test]
    async fn lookup_matches_exact_value() {
        let db = test_db().await;
        seed_entities(db.conn()).await;

        let rows = lookup_with_type(db.conn(), "en", "tt:stock_id", "msft")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity_canonical, "microsoft corp.");
    }

    #[tokio::test]
    async fn get_returns_metadata() {
        let db = test_db().await;
        seed_entities(db.conn()).await;

        let meta = get(db.conn(), "tt:country", "en").await.unwrap();
        assert!(meta.is_well_known);
        assert!(meta.has_ner_support);

        assert!(matches!(
            get(db.conn(), "tt:nope", "en").await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn get_all_enumerates_types() {
        let db = test_db().await;
        seed_entities(db.conn()).await;

        let all = get_all(db.conn()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "tt:country");
    }
}
