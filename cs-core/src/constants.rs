//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "CardShare";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the API origin.
pub const ENV_API_URL: &str = "CARDSHARE_API_URL";

/// Environment variable overriding the API path prefix.
pub const ENV_API_PREFIX: &str = "CARDSHARE_API_PREFIX";

/// Origin used when no configuration source provides one.
pub const FALLBACK_API_URL: &str = "https://api.cardshare.app";

/// Path prefix inserted between the origin and every route.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Per-attempt request ceiling in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Attempts per logical request, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

/// Backoff unit; the wait before attempt `n + 1` is `n` times this.
pub const RETRY_BASE_DELAY_SECS: u64 = 2;

/// Device store schema version.
pub const STORE_SCHEMA_VERSION: i32 = 1;

/// File name of the device store inside the data directory.
pub const STORE_FILE_NAME: &str = "device.db";

/// Well-known device store keys.
pub mod keys {
    pub const AUTH_TOKEN: &str = "authToken";
    pub const USER_ID: &str = "userId";
    pub const USER_NAME: &str = "userName";
    pub const USER_PHONE: &str = "userPhone";
    pub const LAST_AD_INDEX: &str = "lastAdIndex";
    pub const CREDITS_PROGRESS: &str = "creditsProgress";
    pub const CONTACTS_SYNCED_AT: &str = "contactsSyncedAt";
    pub const CONTACTS_SYNCED: &str = "contactsSynced";
    pub const PUSH_TOKEN: &str = "pushToken";

    /// Keys cleared on logout.
    pub const SESSION: &[&str] = &[AUTH_TOKEN, USER_ID, USER_NAME, USER_PHONE];
}
