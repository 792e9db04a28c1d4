//! CardShare Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by all other CardShare crates:
//! - Application configuration and API base-URL resolution
//! - Global error type covering transport, HTTP, storage, and config failures
//! - Structured logging with tracing
//! - Platform directory helpers
//! - Common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::{ApiConfig, AppConfig, BaseUrlSources};
pub use error::{CsError, CsResult};
pub use logging::init_logging;
pub use platform::Platform;
