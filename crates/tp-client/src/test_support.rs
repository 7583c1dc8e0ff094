//! Shared test utilities for client operation tests.

pub(crate) mod helpers {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tp_config::PlatformConfig;
    use tp_core::entities::LocationCandidate;
    use tp_db::TpDb;
    use tp_dsl::test_support::FakeToolkit;

    use crate::discovery::DiscoveryDecoder;
    use crate::lookup::LocationResolver;
    use crate::{ClientError, ThingpediaClient};

    /// Decoder that always resolves to one fixed kind.
    pub struct FixedDecoder(pub &'static str);

    #[async_trait]
    impl DiscoveryDecoder for FixedDecoder {
        async fn decode(&self, _body: &serde_json::Value) -> Result<String, ClientError> {
            Ok(self.0.to_string())
        }
    }

    /// Resolver that returns one fixed candidate for any term.
    pub struct FixedLocations;

    #[async_trait]
    impl LocationResolver for FixedLocations {
        async fn resolve(
            &self,
            _locale: &str,
            term: &str,
        ) -> Result<Vec<LocationCandidate>, ClientError> {
            Ok(vec![LocationCandidate {
                latitude: 37.4419,
                longitude: -122.143,
                display: format!("{term}, CA"),
                rank: 0.9,
            }])
        }
    }

    /// Build a client over a fresh in-memory database.
    pub async fn test_client(
        developer_key: Option<&str>,
        locale: &str,
    ) -> (ThingpediaClient, Arc<TpDb>) {
        let db = Arc::new(TpDb::open_local(":memory:").await.unwrap());
        let client = ThingpediaClient::new(
            db.clone(),
            Arc::new(FakeToolkit),
            Arc::new(FixedDecoder("com.example.bulb")),
            Arc::new(FixedLocations),
            &PlatformConfig::default(),
            developer_key.map(String::from),
            locale,
        );
        (client, db)
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

    /// Insert a device with empty JSON code and return its id.
    pub async fn seed_device(
        conn: &libsql::Connection,
        primary_kind: &str,
        owner: Option<i64>,
        version: i64,
        approved_version: Option<i64>,
        downloadable: bool,
    ) -> i64 {
        seed_device_full(conn, primary_kind, owner, version, approved_version, downloadable, "{}", None)
            .await
    }

    /// Insert a device with explicit code and cached factory.
    pub async fn seed_device_with_factory(
        conn: &libsql::Connection,
        primary_kind: &str,
        owner: Option<i64>,
        version: i64,
        approved_version: Option<i64>,
        code: &str,
        factory: Option<&str>,
    ) -> i64 {
        seed_device_full(conn, primary_kind, owner, version, approved_version, false, code, factory)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn seed_device_full(
        conn: &libsql::Connection,
        primary_kind: &str,
        owner: Option<i64>,
        version: i64,
        approved_version: Option<i64>,
        downloadable: bool,
        code: &str,
        factory: Option<&str>,
    ) -> i64 {
        conn.execute(
            "INSERT INTO devices
               (primary_kind, owner, name, description, category, subcategory,
                version, approved_version, downloadable, code, factory)
             VALUES (?1, ?2, ?3, ?4, 'online', 'service', ?5, ?6, ?7, ?8, ?9)",
            libsql::params![
                primary_kind,
                owner,
                format!("Device {primary_kind}"),
                format!("The {primary_kind} device"),
                version,
                approved_version,
                i64::from(downloadable),
                code,
                factory
            ],
        )
        .await
        .unwrap();
        last_id(conn).await
    }

    /// Map a logical kind to a device for setup resolution.
    pub async fn seed_kind(conn: &libsql::Connection, device_id: i64, kind: &str) {
        conn.execute(
            "INSERT INTO device_kinds (device_id, kind) VALUES (?1, ?2)",
            libsql::params![device_id, kind],
        )
        .await
        .unwrap();
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
            "INSERT INTO examples (schema_id, language, utterance, target_code, name, is_base)
             VALUES (?1, ?2, ?3, ?4, 'internal', 1)",
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
