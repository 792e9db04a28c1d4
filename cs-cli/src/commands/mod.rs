//! CLI command implementations.

pub mod ads;
pub mod auth;
pub mod cards;
pub mod credits;
pub mod groups;
pub mod messages;
pub mod notify;
pub mod request;
pub mod status;
pub mod store;
pub mod vouchers;

use std::path::Path;
use std::sync::Arc;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tracing::info;

use cs_api::{session, ApiClient};
use cs_core::config::{ApiConfig, AppConfig};
use cs_core::error::{CsError, CsResult};
use cs_store::SqliteStore;

/// Everything a command needs: loaded config, the device store and a client over it.
pub struct Context {
    pub config: AppConfig,
    pub store: Arc<SqliteStore>,
    pub api: ApiClient,
}

impl Context {
    /// Open the device store and build the client from every config layer.
    pub fn open(config: AppConfig, manifest: Option<&Path>) -> CsResult<Self> {
        let store = Arc::new(SqliteStore::open(
            &config.effective_store_path()?,
            &config.storage,
        )?);
        let api_config = ApiConfig::resolve(&config, manifest);
        let api = ApiClient::new(&api_config, store.clone())?;
        Ok(Self { config, store, api })
    }

    /// Log in with the configured dev credentials when no token is stored.
    pub async fn ensure_session(&self) -> CsResult<()> {
        if session::is_logged_in(self.store.as_ref())? {
            return Ok(());
        }
        if let Some((identifier, password)) = self.config.dev.auto_login() {
            info!("no stored session, auto-login as {identifier}");
            self.api.login(identifier, password).await?;
        }
        Ok(())
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// A table with the house style and the given header.
pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Cell text for an optional value.
pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|s| !s.is_empty()).unwrap_or("-").to_string()
}

/// Render an RFC 3339 timestamp in local time; anything else is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Truncate a string to a maximum number of characters, appending an ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Map an interactive prompt failure into the crate error.
pub fn prompt_err(e: dialoguer::Error) -> CsError {
    CsError::Internal(format!("prompt failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Ada Lovelace", 8), "Ada L...");
        assert_eq!(truncate("Zoë Ångström", 6), "Zoë...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("x")), "x");
    }

    #[test]
    fn test_format_timestamp_passthrough() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp("2026-03-01T10:00:00Z").len(), 16);
    }
}
