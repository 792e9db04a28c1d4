//! Store schema: version tracking plus the key-value table.

use rusqlite::Connection;
use cs_core::error::{CsError, CsResult};
use tracing::debug;

/// Create the base tables if they do not exist.
pub fn create_tables(conn: &Connection) -> CsResult<()> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| CsError::Storage(format!("failed to create schema: {e}")))?;
    debug!("store schema verified");
    Ok(())
}

/// Drop every table (used for a full reset).
pub fn drop_tables(conn: &Connection) -> CsResult<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS kv;
         DROP TABLE IF EXISTS schema_version;",
    )
    .map_err(|e| CsError::Storage(format!("failed to drop tables: {e}")))?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS kv (
    key         TEXT PRIMARY KEY NOT NULL,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_kv_updated_at ON kv(updated_at);
"#;
