//! # tp-db
//!
//! libSQL database layer for the Thingpedia catalog.
//!
//! Handles all relational state: organizations, devices, schemas, examples,
//! entity types, and string sets. Repo functions live in [`repos`] and take
//! an explicit `&libsql::Connection` so the transactional context is always
//! visible at the call site; there is no ambient connection.
//!
//! Uses the `libsql` crate (C `SQLite` fork), which provides native FTS5 for the
//! device and example search endpoints.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::atomic::{AtomicU64, Ordering};

use error::DatabaseError;
use libsql::Builder;

/// Database handle for the Thingpedia catalog.
///
/// Owns the underlying libSQL database and a default connection. Callers
/// acquire a connection per logical operation with [`Self::connect`] and
/// thread it through repo calls.
pub struct TpDb {
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TpDb {
    /// Open a local-only database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        // A plain ":memory:" path gives every connection its own private
        // database, so migrations run on one connection are invisible to
        // the fresh connections `connect()` hands out. A uniquely named
        // shared-cache URI keeps one database per `TpDb` while letting
        // all its connections share state.
        let path = if path == ":memory:" {
            static NEXT_ID: AtomicU64 = AtomicU64::new(0);
            let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
            format!("file:tp-db-mem-{id}?mode=memory&cache=shared")
        } else {
            path.to_string()
        };
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let tp_db = Self { db, conn };
        tp_db.run_migrations().await?;
        Ok(tp_db)
    }

    /// The default connection, for callers that do not manage their own.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Acquire a fresh connection scoped to one logical operation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be created.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        Ok(self.db.connect()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> TpDb {
        TpDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "organizations",
            "devices",
            "device_kinds",
            "device_discovery_services",
            "device_schemas",
            "device_schema_metadata",
            "examples",
            "entity_names",
            "entity_lexicon",
            "string_types",
            "devices_fts",
            "examples_fts",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn devices_fts_trigger_populates_on_insert() {
        let db = test_db().await;

        db.conn()
            .execute(
                "INSERT INTO devices (primary_kind, name, description, approved_version, version)
                 VALUES ('com.example.weather', 'Weather', 'Weather forecasts', 0, 0)",
                (),
            )
            .await
            .unwrap();

        let mut rows = db
            .conn()
            .query(
                "SELECT rowid FROM devices_fts WHERE devices_fts MATCH 'forecast'",
                (),
            )
            .await
            .unwrap();
        assert!(
            rows.next().await.unwrap().is_some(),
            "FTS trigger should populate on INSERT"
        );
    }

    #[tokio::test]
    async fn fresh_connections_share_state() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO organizations (developer_key, is_admin) VALUES ('k1', 0)",
                (),
            )
            .await
            .unwrap();

        let conn = db.connect().unwrap();
        let mut rows = conn
            .query("SELECT COUNT(*) FROM organizations", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
