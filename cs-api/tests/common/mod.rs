//! Shared test utilities for API client integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use cs_api::{ApiClient, HttpRequest, RawResponse, Transport};
use cs_core::config::ApiConfig;
use cs_core::constants::keys;
use cs_core::error::{CsError, CsResult};
use cs_store::MemoryStore;

pub const BASE: &str = "https://api.test.local";

/// One scripted transport outcome.
#[derive(Debug, Clone)]
pub enum Step {
    /// Answer with a status and body text.
    Respond(u16, String),
    /// Never answer; the client's timeout must fire.
    Hang,
    /// Fail to connect (request never left the client).
    Refused,
    /// Connection dropped after the request was sent.
    Reset,
}

pub fn ok_json(body: serde_json::Value) -> Step {
    Step::Respond(200, body.to_string())
}

pub fn status(code: u16, body: &str) -> Step {
    Step::Respond(code, body.to_string())
}

/// Transport that plays back a script and records every request it sees.
///
/// When the script runs out, the last step repeats.
pub struct MockTransport {
    script: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    calls: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl MockTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    /// Instants at which each attempt started.
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    fn next_step(&self) -> Step {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        match script.pop_front() {
            Some(step) => {
                *last = Some(step.clone());
                step
            }
            None => last
                .clone()
                .unwrap_or_else(|| Step::Respond(200, "{}".to_string())),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> CsResult<RawResponse> {
        let url = request.url.clone();
        self.calls.lock().unwrap().push((Instant::now(), request));
        match self.next_step() {
            Step::Respond(status, body) => Ok(RawResponse { status, body }),
            Step::Hang => std::future::pending::<CsResult<RawResponse>>().await,
            Step::Refused => Err(CsError::Network {
                url,
                message: "connection refused".into(),
                connect: true,
            }),
            Step::Reset => Err(CsError::Network {
                url,
                message: "connection reset by peer".into(),
                connect: false,
            }),
        }
    }
}

/// Client over a mock transport with an empty in-memory store.
pub fn client(transport: Arc<MockTransport>) -> (ApiClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let api = ApiClient::with_transport(&ApiConfig::new(BASE), transport, store.clone());
    (api, store)
}

/// Client whose store already holds a token.
pub fn authed_client(transport: Arc<MockTransport>, token: &str) -> (ApiClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_entries([(keys::AUTH_TOKEN, token)]));
    let api = ApiClient::with_transport(&ApiConfig::new(BASE), transport, store.clone());
    (api, store)
}
