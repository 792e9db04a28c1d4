//! SQLite-backed device store with r2d2 connection pooling.
//!
//! Opens the file in WAL mode, creates the schema and applies migrations on
//! startup, then serves single-key reads and writes.

use std::path::Path;
use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info, warn};

use cs_core::config::StorageConfig;
use cs_core::error::{CsError, CsResult};

use crate::kv::KeyValueStore;
use crate::migrations;
use crate::schema;

/// Type alias for the SQLite connection pool.
pub type StorePool = Pool<SqliteConnectionManager>;

/// One stored key with its value and last write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEntry {
    pub key: String,
    pub value: String,
    /// RFC 3339 timestamp of the last write.
    pub updated_at: String,
}

/// Persistent key-value store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<StorePool>,
}

impl SqliteStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path, config: &StorageConfig) -> CsResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("opening device store at {}", path.display());

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_customizer(Box::new(ConnectionCustomizer {
                wal_mode: config.wal_mode,
            }))
            .build(manager)
            .map_err(|e| CsError::Pool(e.to_string()))?;

        let store = Self {
            pool: Arc::new(pool),
        };

        {
            let conn = store.conn()?;
            schema::create_tables(&conn)?;
            migrations::run_migrations(&conn)?;
        }

        Ok(store)
    }

    /// Get a connection from the pool.
    pub fn conn(&self) -> CsResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| CsError::Pool(e.to_string()))
    }

    /// Every entry with its write time, sorted by key.
    pub fn entries(&self) -> CsResult<Vec<StoreEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT key, value, updated_at FROM kv ORDER BY key")
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoreEntry {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            })
            .map_err(storage_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage_err)
    }

    /// Number of stored keys.
    pub fn len(&self) -> CsResult<i64> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .map_err(storage_err)
    }

    pub fn is_empty(&self) -> CsResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Drop and recreate all tables.
    pub fn reset(&self) -> CsResult<()> {
        warn!("resetting device store - all keys will be lost");
        let conn = self.conn()?;
        schema::drop_tables(&conn)?;
        schema::create_tables(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> CsResult<Option<String>> {
        let conn = self.conn()?;
        conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(storage_err)
    }

    fn set(&self, key: &str, value: &str) -> CsResult<()> {
        let conn = self.conn()?;
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )
        .map_err(storage_err)?;
        debug!("store set {key}");
        Ok(())
    }

    fn remove(&self, key: &str) -> CsResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(storage_err)?;
        debug!("store remove {key}");
        Ok(())
    }

    fn keys(&self) -> CsResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT key FROM kv ORDER BY key")
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(storage_err)?;
        rows.collect::<Result<Vec<String>, _>>().map_err(storage_err)
    }

    fn clear(&self) -> CsResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv", []).map_err(storage_err)?;
        Ok(())
    }
}

fn storage_err(e: rusqlite::Error) -> CsError {
    CsError::Storage(e.to_string())
}

/// r2d2 connection customizer that applies PRAGMA settings.
#[derive(Debug)]
struct ConnectionCustomizer {
    wal_mode: bool,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        if self.wal_mode {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        }
        conn.execute_batch(
            "PRAGMA synchronous=NORMAL;
             PRAGMA busy_timeout=5000;",
        )?;
        Ok(())
    }
}
