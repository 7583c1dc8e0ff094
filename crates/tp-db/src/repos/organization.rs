//! Organization lookup: developer-key resolution.

use tp_core::entities::Organization;

use crate::error::DatabaseError;
use crate::helpers::get_bool;

fn row_to_org(row: &libsql::Row) -> Result<Organization, DatabaseError> {
    Ok(Organization {
        id: row.get::<i64>(0)?,
        developer_key: row.get::<String>(1)?,
        is_admin: get_bool(row, 2)?,
    })
}

/// Look up the organization owning a developer key.
///
/// A missing key resolves to `None` without touching the database.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_developer_key(
    conn: &libsql::Connection,
    developer_key: Option<&str>,
) -> Result<Option<Organization>, DatabaseError> {
    let Some(key) = developer_key else {
        return Ok(None);
    };

    let mut rows = conn
        .query(
            "SELECT id, developer_key, is_admin FROM organizations WHERE developer_key = ?1",
            [key],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_org(&row)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_db;

    #[tokio::test]
    async fn missing_key_resolves_to_none() {
        let db = test_db().await;
        let org = get_by_developer_key(db.conn(), None).await.unwrap();
        assert!(org.is_none());
    }

    #[tokio::test]
    async fn unknown_key_resolves_to_none() {
        let db = test_db().await;
        let org = get_by_developer_key(db.conn(), Some("nope")).await.unwrap();
        assert!(org.is_none());
    }

    #[tokio::test]
    async fn known_key_resolves_to_org() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO organizations (developer_key, is_admin) VALUES ('dev-key-1', 1)",
                (),
            )
            .await
            .unwrap();

        let org = get_by_developer_key(db.conn(), Some("dev-key-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(org.developer_key, "dev-key-1");
        assert!(org.is_admin);
    }
}
