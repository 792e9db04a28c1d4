//! Application configuration management.
//!
//! Handles loading and saving the TOML configuration file and resolving the
//! layered API origin into an explicit [`ApiConfig`] that is handed to the
//! HTTP client at startup. Nothing here is global: resolve once, pass it on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants;
use crate::error::{CsError, CsResult};
use crate::platform::Platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Device store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Push notification settings.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Developer conveniences.
    #[serde(default)]
    pub dev: DevConfig,
}

/// Backend API settings as written in config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Runtime-configured API origin. Outranked by the environment variable.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Path prefix inserted before every route (default `/api`).
    #[serde(default)]
    pub prefix: Option<String>,

    /// Per-attempt timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per logical request, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit in milliseconds.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Allow POST/PATCH to be retried after a timeout or 5xx.
    #[serde(default)]
    pub retry_non_idempotent: bool,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub custom_headers: HashMap<String, String>,
}

/// Device store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite store. If empty, uses the data directory.
    #[serde(default)]
    pub path: String,

    /// Enable WAL mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

/// Push notification configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Push service project identifier sent with token registration.
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Developer auto-login credentials. Only used when no token is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default)]
    pub auto_login_identifier: Option<String>,

    #[serde(default)]
    pub auto_login_password: Option<String>,
}

// Default value functions for serde

fn default_timeout_secs() -> u64 {
    constants::REQUEST_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    constants::MAX_ATTEMPTS
}

fn default_retry_base_delay_ms() -> u64 {
    constants::RETRY_BASE_DELAY_SECS * 1000
}

fn default_true() -> bool {
    true
}

fn default_pool_size() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            prefix: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_non_idempotent: false,
            custom_headers: HashMap::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            wal_mode: true,
            pool_size: default_pool_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl DevConfig {
    /// Both auto-login fields, when both are set and non-empty.
    pub fn auto_login(&self) -> Option<(&str, &str)> {
        match (
            self.auto_login_identifier.as_deref().filter(|s| !s.is_empty()),
            self.auto_login_password.as_deref().filter(|s| !s.is_empty()),
        ) {
            (Some(id), Some(pw)) => Some((id, pw)),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> CsResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> CsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> CsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CsError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> CsResult<PathBuf> {
        Ok(Platform::config_dir()?.join("config.toml"))
    }

    /// Get the effective store path, using the configured path or the default.
    pub fn effective_store_path(&self) -> CsResult<PathBuf> {
        if self.storage.path.is_empty() {
            Ok(Platform::data_dir()?.join(constants::STORE_FILE_NAME))
        } else {
            Ok(PathBuf::from(&self.storage.path))
        }
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> CsResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(Platform::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Sanitize and normalize an API origin.
    ///
    /// Strips whitespace and surrounding quotes, adds a scheme when missing
    /// (plain http for local hosts, https otherwise) and drops trailing slashes.
    pub fn sanitize_server_address(address: &str) -> String {
        let trimmed = address.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else if is_local_host(trimmed) {
            format!("http://{trimmed}")
        } else {
            format!("https://{trimmed}")
        };

        with_scheme.trim_end_matches('/').to_string()
    }
}

fn is_local_host(address: &str) -> bool {
    address.starts_with("localhost")
        || address.starts_with("127.")
        || address.starts_with("10.")
        || address.starts_with("192.168.")
}

/// Candidate API origins, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrlSources {
    /// Environment variable (compile-time value, else process environment).
    pub env: Option<String>,
    /// `[api] base_url` from the runtime config file.
    pub runtime_extra: Option<String>,
    /// `extra.apiUrl` from a legacy app manifest.
    pub legacy_extra: Option<String>,
}

impl BaseUrlSources {
    /// Gather sources from the environment, the loaded config and an optional manifest.
    ///
    /// The manifest is only read when no higher source is set. An unreadable
    /// manifest is logged and skipped.
    pub fn collect(config: &AppConfig, manifest: Option<&Path>) -> Self {
        // option_env! takes a literal; it must match constants::ENV_API_URL.
        let env = first_non_blank(
            option_env!("CARDSHARE_API_URL"),
            std::env::var(constants::ENV_API_URL).ok(),
        );
        let runtime_extra = config.api.base_url.clone();

        let higher_set = [&env, &runtime_extra]
            .into_iter()
            .flatten()
            .any(|s| !AppConfig::sanitize_server_address(s).is_empty());
        let legacy_extra = match manifest {
            Some(path) if !higher_set => legacy_manifest_api_url(path).unwrap_or_else(|e| {
                warn!("ignoring unreadable manifest {}: {e}", path.display());
                None
            }),
            _ => None,
        };

        Self {
            env,
            runtime_extra,
            legacy_extra,
        }
    }

    /// First non-empty source wins; otherwise the hardcoded fallback.
    pub fn resolve(&self) -> String {
        let chosen = [&self.env, &self.runtime_extra, &self.legacy_extra]
            .into_iter()
            .flatten()
            .map(|s| AppConfig::sanitize_server_address(s))
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| constants::FALLBACK_API_URL.to_string());
        debug!("resolved api origin {chosen}");
        chosen
    }
}

/// Compile-time value unless it is blank, then the process environment.
fn first_non_blank(compiled: Option<&str>, runtime: Option<String>) -> Option<String> {
    compiled
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .or_else(|| runtime.filter(|s| !s.trim().is_empty()))
}

/// Read `extra.apiUrl` (or `expo.extra.apiUrl`) from a legacy JSON manifest.
pub fn legacy_manifest_api_url(path: &Path) -> CsResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let manifest: serde_json::Value = serde_json::from_str(&contents)?;
    let extra = manifest
        .get("extra")
        .or_else(|| manifest.get("expo").and_then(|e| e.get("extra")));
    Ok(extra
        .and_then(|e| e.get("apiUrl"))
        .and_then(|v| v.as_str())
        .map(str::to_string))
}

/// Fully resolved API settings, constructed once and passed to the client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Origin, e.g. `https://api.cardshare.app`.
    pub base_url: String,
    /// Route prefix, e.g. `/api`.
    pub prefix: String,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Attempts per logical request.
    pub max_attempts: u32,
    /// Backoff unit.
    pub retry_base_delay: Duration,
    /// Allow non-idempotent methods to retry after ambiguous failures.
    pub retry_non_idempotent: bool,
    /// Extra headers sent with every request.
    pub custom_headers: Vec<(String, String)>,
}

impl ApiConfig {
    /// Build from an explicit origin with default timing.
    pub fn new(base_url: &str) -> Self {
        Self::from_settings(
            AppConfig::sanitize_server_address(base_url),
            &ApiSettings::default(),
        )
    }

    /// Resolve from every configuration layer.
    pub fn resolve(config: &AppConfig, manifest: Option<&Path>) -> Self {
        let sources = BaseUrlSources::collect(config, manifest);
        let mut api = Self::from_settings(sources.resolve(), &config.api);
        if let Ok(prefix) = std::env::var(constants::ENV_API_PREFIX) {
            api.prefix = normalize_prefix(&prefix);
        }
        api
    }

    fn from_settings(base_url: String, settings: &ApiSettings) -> Self {
        let mut custom_headers: Vec<(String, String)> = settings
            .custom_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        custom_headers.sort();

        Self {
            base_url,
            prefix: normalize_prefix(
                settings
                    .prefix
                    .as_deref()
                    .unwrap_or(constants::DEFAULT_API_PREFIX),
            ),
            timeout: Duration::from_secs(settings.timeout_secs),
            max_attempts: settings.max_attempts.max(1),
            retry_base_delay: Duration::from_millis(settings.retry_base_delay_ms),
            retry_non_idempotent: settings.retry_non_idempotent,
            custom_headers,
        }
    }

    /// `base + prefix`, the root every route hangs off.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url, self.prefix)
    }
}

/// Ensure a prefix has one leading slash and no trailing slash. Empty stays empty.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
