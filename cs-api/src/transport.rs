//! The seam between the request client and the network.
//!
//! [`ApiClient`](crate::ApiClient) builds transport-neutral [`HttpRequest`]s
//! and hands them to a [`Transport`]. The production transport wraps
//! `reqwest`; tests substitute a scripted one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::trace;

use cs_core::error::{CsError, CsResult};

use crate::body::RequestBody;

/// A fully resolved outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Look up a header value, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and full body text of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request attempt.
///
/// Implementations report transport failures as [`CsError::Timeout`] or
/// [`CsError::Network`]; any received response, whatever its status, is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> CsResult<RawResponse>;
}

/// Production transport over a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    /// Build the underlying client. The per-attempt ceiling is enforced by
    /// the caller; only the connect phase is bounded here.
    pub fn new() -> CsResult<Self> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| CsError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> CsResult<RawResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.inner.request(method, &url);
        for (key, value) in &headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder = match body {
            Some(RequestBody::Json(value)) => builder.body(serde_json::to_vec(&value)?),
            Some(RequestBody::Multipart(form)) => builder.multipart(form.to_reqwest()?),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| classify_error(&url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(&url, e))?;

        trace!("{status} from {url} ({} bytes)", body.len());
        Ok(RawResponse { status, body })
    }
}

/// Classify a reqwest error into a CsError variant.
fn classify_error(url: &str, e: reqwest::Error) -> CsError {
    if e.is_timeout() {
        CsError::Timeout { url: url.to_string() }
    } else if e.is_builder() {
        CsError::InvalidRequest(e.to_string())
    } else {
        CsError::Network {
            url: url.to_string(),
            message: e.to_string(),
            connect: e.is_connect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = HttpRequest {
            method: Method::GET,
            url: "https://api.example.com/api/cards".into(),
            headers: vec![("Authorization".into(), "Bearer t".into())],
            body: None,
        };
        assert_eq!(req.header("authorization"), Some("Bearer t"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn test_transport_builds() {
        assert!(ReqwestTransport::new().is_ok());
    }
}
