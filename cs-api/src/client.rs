//! HTTP client for the CardShare backend REST API.
//!
//! Handles URL resolution, bearer authentication from the device store,
//! JSON/multipart bodies, per-attempt timeouts, classified retry with linear
//! backoff, and status-to-error conversion.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Method;
use tracing::{debug, warn};

use cs_core::config::ApiConfig;
use cs_core::constants::keys;
use cs_core::error::{CsError, CsResult};
use cs_store::KeyValueStore;

use crate::body::RequestBody;
use crate::response::ApiResponse;
use crate::retry::RetryPolicy;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    /// `Some(true)` lets a non-idempotent call retry after ambiguous
    /// failures; `Some(false)` makes the call single-attempt.
    pub retry: Option<bool>,
    /// Replaces the configured per-attempt timeout (large uploads).
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self {
            retry: Some(false),
            ..Self::default()
        }
    }

    /// Opt a non-idempotent call into retries (backend is idempotency-keyed).
    pub fn retry_unsafe() -> Self {
        Self {
            retry: Some(true),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Client for the CardShare backend.
///
/// Cheap to clone; clones share the transport and the store.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    store: Arc<dyn KeyValueStore>,
    api_root: String,
    timeout: Duration,
    custom_headers: Vec<(String, String)>,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a client over the production reqwest transport.
    pub fn new(config: &ApiConfig, store: Arc<dyn KeyValueStore>) -> CsResult<Self> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport), store))
    }

    /// Create a client over any transport.
    pub fn with_transport(
        config: &ApiConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            transport,
            store,
            api_root: config.api_root(),
            timeout: config.timeout,
            custom_headers: config.custom_headers.clone(),
            retry: RetryPolicy::from_config(config),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// `base + prefix`, e.g. `https://api.cardshare.app/api`.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The device store the client reads its token from.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Full URL for a route; a missing leading slash is added.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.api_root)
        } else {
            format!("{}/{path}", self.api_root)
        }
    }

    /// Stored bearer token. Missing or unreadable means unauthenticated.
    fn auth_token(&self) -> Option<String> {
        match self.store.get(keys::AUTH_TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("could not read auth token, sending unauthenticated: {e}");
                None
            }
        }
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&RequestBody>,
    ) -> HttpRequest {
        let mut headers: Vec<(String, String)> =
            vec![("Accept".into(), "application/json".into())];
        // Multipart gets its content type (with boundary) from the HTTP stack.
        if let Some(RequestBody::Json(_)) = body {
            headers.push(("Content-Type".into(), "application/json".into()));
        }
        if let Some(token) = token {
            headers.push(("Authorization".into(), format!("Bearer {token}")));
        }
        headers.extend(self.custom_headers.iter().cloned());

        HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body.cloned(),
        }
    }

    /// Send one logical request with timeout and retry.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> CsResult<ApiResponse> {
        let url = self.url(path);
        let token = self.auth_token();
        let timeout = options.timeout.unwrap_or(self.timeout);
        let max_attempts = match options.retry {
            Some(false) => 1,
            _ => self.retry.max_attempts,
        };
        let allow_unsafe = options.retry == Some(true);

        let mut last_error: Option<CsError> = None;

        for attempt in 1..=max_attempts {
            debug!("{method} {path} (attempt {attempt}/{max_attempts})");
            let request = self.build_request(method.clone(), &url, token.as_deref(), body.as_ref());

            let outcome = match tokio::time::timeout(timeout, self.transport.send(request)).await {
                Ok(result) => result,
                Err(_) => Err(CsError::Timeout { url: url.clone() }),
            };

            let error = match outcome {
                Ok(raw) => {
                    let response = ApiResponse::from_raw(raw);
                    if response.is_success() {
                        return Ok(response);
                    }
                    CsError::Http {
                        status: response.status,
                        url: url.clone(),
                        body: response.into_value(),
                    }
                }
                Err(e) => e,
            };

            if !self.retry.should_retry(&method, allow_unsafe, &error) {
                debug!("{method} {path} failed without retry: {error}");
                return Err(error);
            }

            if attempt < max_attempts {
                let delay = self.retry.delay_for(attempt);
                warn!(
                    "{method} {path} failed ({error}), retrying in {:.1}s (attempt {}/{max_attempts})",
                    delay.as_secs_f64(),
                    attempt + 1,
                );
                tokio::time::sleep(delay).await;
            } else {
                warn!("{method} {path} failed after {max_attempts} attempts: {error}");
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or(CsError::Unreachable {
            url,
            attempts: max_attempts,
        }))
    }

    // --- Public HTTP methods ---

    /// GET a route.
    pub async fn get(&self, path: &str) -> CsResult<ApiResponse> {
        self.send(Method::GET, path, None, RequestOptions::default())
            .await
    }

    /// POST a JSON or multipart body.
    pub async fn post(
        &self,
        path: &str,
        body: impl Into<RequestBody>,
        options: RequestOptions,
    ) -> CsResult<ApiResponse> {
        self.send(Method::POST, path, Some(body.into()), options)
            .await
    }

    /// PUT a JSON or multipart body.
    pub async fn put(&self, path: &str, body: impl Into<RequestBody>) -> CsResult<ApiResponse> {
        self.send(Method::PUT, path, Some(body.into()), RequestOptions::default())
            .await
    }

    /// PATCH a JSON or multipart body.
    pub async fn patch(&self, path: &str, body: impl Into<RequestBody>) -> CsResult<ApiResponse> {
        self.send(Method::PATCH, path, Some(body.into()), RequestOptions::default())
            .await
    }

    /// DELETE a route.
    pub async fn delete(&self, path: &str) -> CsResult<ApiResponse> {
        self.send(Method::DELETE, path, None, RequestOptions::default())
            .await
    }

    /// Probe `/health` once and return the round-trip latency.
    pub async fn health_check(&self) -> CsResult<Duration> {
        let start = Instant::now();
        self.send(Method::GET, "/health", None, RequestOptions::no_retry())
            .await?;
        Ok(start.elapsed())
    }
}
