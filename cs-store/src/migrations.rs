//! Versioned store migrations.
//!
//! Migrations run sequentially from the stored version to the latest.

use rusqlite::Connection;
use tracing::{info, warn};
use cs_core::constants::STORE_SCHEMA_VERSION;
use cs_core::error::{CsError, CsResult};

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> CsResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version >= STORE_SCHEMA_VERSION {
        return Ok(());
    }

    info!("migrating store from version {current_version} to {STORE_SCHEMA_VERSION}");

    for version in (current_version + 1)..=STORE_SCHEMA_VERSION {
        run_migration(conn, version)?;
    }

    set_schema_version(conn, STORE_SCHEMA_VERSION)?;
    Ok(())
}

/// Current schema version; inserts 0 on first run.
fn get_schema_version(conn: &Connection) -> CsResult<i32> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .map_err(|e| CsError::Migration(e.to_string()))?;

    if count == 0 {
        conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])
            .map_err(|e| CsError::Migration(e.to_string()))?;
        return Ok(0);
    }

    conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .map_err(|e| CsError::Migration(e.to_string()))
}

fn set_schema_version(conn: &Connection, version: i32) -> CsResult<()> {
    conn.execute("UPDATE schema_version SET version = ?1", [version])
        .map_err(|e| CsError::Migration(e.to_string()))?;
    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> CsResult<()> {
    info!("applying store migration version {version}");

    match version {
        1 => migration_v1(conn),
        _ => {
            warn!("unknown migration version {version}, skipping");
            Ok(())
        }
    }
}

/// v1: track when each key was last written. Fresh stores already have the
/// column; this upgrades stores created before it existed.
fn migration_v1(conn: &Connection) -> CsResult<()> {
    let has_column: bool = conn
        .prepare("SELECT 1 FROM pragma_table_info('kv') WHERE name = 'updated_at'")
        .and_then(|mut stmt| stmt.exists([]))
        .map_err(|e| CsError::Migration(e.to_string()))?;

    if !has_column {
        conn.execute_batch(
            "ALTER TABLE kv ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';
             CREATE INDEX IF NOT EXISTS idx_kv_updated_at ON kv(updated_at);",
        )
        .map_err(|e| CsError::Migration(e.to_string()))?;
    }

    Ok(())
}
