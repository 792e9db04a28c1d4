//! CardShare API - HTTP client for the CardShare backend REST API.
//!
//! Resolves every route against one configured origin, injects the stored
//! bearer token, sends JSON or multipart bodies, and retries transient
//! failures with linear backoff. Endpoint modules add typed helpers per
//! backend area on top of the generic verbs.

pub mod body;
pub mod client;
pub mod endpoints;
pub mod response;
pub mod retry;
pub mod session;
pub mod transport;

// Re-export key types
pub use reqwest::Method;
pub use body::{FilePart, MultipartForm, RequestBody};
pub use client::{ApiClient, RequestOptions};
pub use response::{ApiResponse, ResponseBody};
pub use retry::RetryPolicy;
pub use session::CachedUser;
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport};
