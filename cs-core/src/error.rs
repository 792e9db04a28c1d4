//! Global error types for the CardShare client.
//!
//! All error categories across the client are unified into a single
//! `CsError` enum with conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using CsError.
pub type CsResult<T> = Result<T, CsError>;

/// Unified error type covering all error categories in the client.
#[derive(Error, Debug)]
pub enum CsError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Storage errors --
    /// SQLite error from the device store.
    #[error("storage error: {0}")]
    Storage(String),

    /// Store connection pool error.
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Store migration failed.
    #[error("migration error: {0}")]
    Migration(String),

    // -- Network errors --
    /// The request did not complete before the per-attempt ceiling.
    #[error("request to {url} timed out")]
    Timeout {
        /// Resolved request URL.
        url: String,
    },

    /// Connection, DNS, or other transport-level failure.
    #[error("network error for {url}: {message}")]
    Network {
        /// Resolved request URL.
        url: String,
        /// Transport error description.
        message: String,
        /// Whether the request never left the client (connect/DNS failure).
        connect: bool,
    },

    /// The server answered with a non-success status.
    #[error("http {status} from {url}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Resolved request URL.
        url: String,
        /// Parsed JSON body, or the raw text wrapped as a JSON string.
        body: serde_json::Value,
    },

    /// Every attempt failed without a recorded error.
    #[error("api unreachable at {url} after {attempts} attempts")]
    Unreachable {
        /// Resolved request URL.
        url: String,
        /// Attempts made.
        attempts: u32,
    },

    /// Request could not be built (bad header, bad multipart part).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // -- Session errors --
    /// Login or registration response was missing required fields.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CsError {
    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            CsError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened below HTTP (timeout or network).
    pub fn is_transport(&self) -> bool {
        matches!(self, CsError::Timeout { .. } | CsError::Network { .. })
    }

    /// Server-provided message from a `{ "message": ... }` error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            CsError::Http { body, .. } => body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(|m| m.as_str()),
            _ => None,
        }
    }

    /// Human-readable message suitable for an alert dialog.
    pub fn user_message(&self) -> String {
        match self {
            CsError::Timeout { .. } => {
                "The server took too long to respond. It may be waking up; please try again."
                    .to_string()
            }
            CsError::Network { .. } => {
                "Network request failed. Please check your connection.".to_string()
            }
            CsError::Http { status: 404, .. } => {
                "API endpoint not found. Please contact support.".to_string()
            }
            CsError::Http { status, .. } if *status >= 500 => {
                "Server error. Please try again later.".to_string()
            }
            CsError::Http { status, .. } => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {status}.")),
            CsError::Unreachable { .. } => {
                "The API is unreachable. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for CsError {
    fn from(e: serde_json::Error) -> Self {
        CsError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CsError {
    fn from(e: toml::de::Error) -> Self {
        CsError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: serde_json::Value) -> CsError {
        CsError::Http {
            status,
            url: "https://api.example.com/api/cards".into(),
            body,
        }
    }

    #[test]
    fn test_cs_error_display() {
        let err = CsError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn test_user_message_not_found() {
        let msg = http(404, serde_json::Value::Null).user_message();
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_user_message_server_error() {
        let msg = http(503, serde_json::json!("Service Unavailable")).user_message();
        assert!(msg.starts_with("Server error"));
    }

    #[test]
    fn test_user_message_prefers_server_text_for_4xx() {
        let err = http(400, serde_json::json!({"success": false, "message": "Insufficient credits"}));
        assert_eq!(err.server_message(), Some("Insufficient credits"));
        assert_eq!(err.user_message(), "Insufficient credits");
    }

    #[test]
    fn test_transport_classification() {
        let t = CsError::Timeout { url: "u".into() };
        let n = CsError::Network { url: "u".into(), message: "dns".into(), connect: true };
        assert!(t.is_transport());
        assert!(n.is_transport());
        assert!(!http(500, serde_json::Value::Null).is_transport());
        assert!(n.user_message().contains("connection"));
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(http(401, serde_json::Value::Null).status(), Some(401));
        assert_eq!(CsError::Timeout { url: "u".into() }.status(), None);
    }
}
