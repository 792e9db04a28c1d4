//! Retry classification and linear backoff.
//!
//! A failure is retried only when repeating the request cannot duplicate a
//! side effect the server already applied:
//! - connect/DNS failures never reached the server and are always retryable;
//! - timeouts, dropped connections and 5xx/408/429 answers are retryable for
//!   idempotent methods, and for POST/PATCH only when explicitly allowed;
//! - every other status (4xx, 501) is final.

use std::time::Duration;

use reqwest::Method;

use cs_core::config::ApiConfig;
use cs_core::error::CsError;

/// Retry limits and backoff for one client.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per logical request, including the first. At least 1.
    pub max_attempts: u32,
    /// Wait before attempt `n + 1` is `base_delay * n`.
    pub base_delay: Duration,
    /// Treat POST/PATCH like idempotent methods.
    pub retry_non_idempotent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: cs_core::constants::MAX_ATTEMPTS,
            base_delay: Duration::from_secs(cs_core::constants::RETRY_BASE_DELAY_SECS),
            retry_non_idempotent: false,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.retry_base_delay,
            retry_non_idempotent: config.retry_non_idempotent,
        }
    }

    /// Backoff after the given 1-based failed attempt: 2s, 4s, 6s, ...
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        self.base_delay.saturating_mul(failed_attempt.max(1))
    }

    /// Whether `error` from a `method` request may be retried.
    ///
    /// `allow_unsafe` is the per-call opt-in for non-idempotent methods.
    pub fn should_retry(&self, method: &Method, allow_unsafe: bool, error: &CsError) -> bool {
        let repeatable = is_idempotent(method) || allow_unsafe || self.retry_non_idempotent;
        match error {
            CsError::Network { connect: true, .. } => true,
            CsError::Network { .. } | CsError::Timeout { .. } => repeatable,
            CsError::Http { status, .. } => repeatable && is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Methods whose repetition has no additional effect.
pub fn is_idempotent(method: &Method) -> bool {
    [Method::GET, Method::HEAD, Method::PUT, Method::DELETE, Method::OPTIONS].contains(method)
}

fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || (status >= 500 && status != 501)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> CsError {
        CsError::Http {
            status,
            url: "u".into(),
            body: serde_json::Value::Null,
        }
    }

    fn timeout() -> CsError {
        CsError::Timeout { url: "u".into() }
    }

    #[test]
    fn test_linear_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(6));
    }

    #[test]
    fn test_get_retries_transient_and_5xx() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&Method::GET, false, &timeout()));
        assert!(policy.should_retry(&Method::GET, false, &http(503)));
        assert!(policy.should_retry(&Method::GET, false, &http(429)));
        assert!(!policy.should_retry(&Method::GET, false, &http(501)));
    }

    #[test]
    fn test_4xx_is_final() {
        let policy = RetryPolicy::default();
        for status in [400, 401, 403, 404, 422] {
            assert!(!policy.should_retry(&Method::GET, true, &http(status)));
        }
    }

    #[test]
    fn test_post_only_retries_connect_failures_by_default() {
        let policy = RetryPolicy::default();
        let refused = CsError::Network {
            url: "u".into(),
            message: "refused".into(),
            connect: true,
        };
        let reset = CsError::Network {
            url: "u".into(),
            message: "reset".into(),
            connect: false,
        };
        assert!(policy.should_retry(&Method::POST, false, &refused));
        assert!(!policy.should_retry(&Method::POST, false, &reset));
        assert!(!policy.should_retry(&Method::POST, false, &timeout()));
        assert!(!policy.should_retry(&Method::PATCH, false, &http(503)));
    }

    #[test]
    fn test_post_opt_in() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&Method::POST, true, &timeout()));

        let lenient = RetryPolicy {
            retry_non_idempotent: true,
            ..RetryPolicy::default()
        };
        assert!(lenient.should_retry(&Method::POST, false, &http(502)));
    }

    #[test]
    fn test_non_transport_errors_are_final() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(
            &Method::GET,
            true,
            &CsError::Serialization("bad".into())
        ));
    }
}
