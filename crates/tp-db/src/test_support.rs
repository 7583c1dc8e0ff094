//! Shared test utilities for tp-db repo tests.

pub(crate) mod helpers {
    use crate::TpDb;

    /// Create an in-memory database with migrations applied.
    pub async fn test_db() -> TpDb {
        TpDb::open_local(":memory:").await.unwrap()
    }

    /// Insert an organization and return its id.
    pub async fn seed_org(conn: &libsql::Connection, key: &str, is_admin: bool) -> i64 {
        conn.execute(
            "INSERT INTO organizations (developer_key, is_admin) VALUES (?1, ?2)",
            libsql::params![key, i64::from(is_admin)],
        )
        .await
        .unwrap();
        last_id(conn).await
    }

    /// Insert a device and return its id. `approved_version = None` makes the
    /// device visible only to its owner (and admins).
    #[allow(clippy::too_many_arguments)]
    pub async fn seed_device(
        conn: &libsql::Connection,
        primary_kind: &str,
        owner: Option<i64>,
        category: &str,
        subcategory: &str,
        version: i64,
        approved_version: Option<i64>,
        downloadable: bool,
        code: &str,
    ) -> i64 {
        conn.execute(
            "INSERT INTO devices
               (primary_kind, owner, name, description, category, subcategory,
                version, approved_version, downloadable, code)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            libsql::params![
                primary_kind,
                owner,
                format!("Device {primary_kind}"),
                format!("The {primary_kind} device"),
                category,
                subcategory,
                version,
                approved_version,
                i64::from(downloadable),
                code
            ],
        )
        .await
        .unwrap();
        let id = last_id(conn).await;
        conn.execute(
            "INSERT INTO device_kinds (device_id, kind) VALUES (?1, ?2)",
            libsql::params![id, primary_kind],
        )
        .await
        .unwrap();
        id
    }

    /// Insert a schema row and return its id.
    pub async fn seed_schema(
        conn: &libsql::Connection,
        kind: &str,
        owner: Option<i64>,
        approved_version: Option<i64>,
        types: &str,
    ) -> i64 {
        conn.execute(
            "INSERT INTO device_schemas
               (kind, kind_canonical, owner, approved_version, developer_version, types)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            libsql::params![kind, kind.replace('.', " "), owner, approved_version, types],
        )
        .await
        .unwrap();
        last_id(conn).await
    }

    /// Insert an example row and return its id.
    pub async fn seed_example(
        conn: &libsql::Connection,
        schema_id: i64,
        language: &str,
        utterance: &str,
        target_code: &str,
    ) -> i64 {
        conn.execute(
            "INSERT INTO examples (schema_id, language, utterance, target_code, name)
             VALUES (?1, ?2, ?3, ?4, 'internal')",
            libsql::params![schema_id, language, utterance, target_code],
        )
        .await
        .unwrap();
        last_id(conn).await
    }

    async fn last_id(conn: &libsql::Connection) -> i64 {
        let mut rows = conn.query("SELECT last_insert_rowid()", ()).await.unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }
}
