//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kerliix_oauth::{
    Clock, ClientConfig, HttpRequest, HttpResponse, HttpTransport, OAuthClient, OAuthError,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const CLIENT_ID: &str = "client-1";
pub const SECRET: &str = "s3cret";
pub const REDIRECT_URI: &str = "https://app.example/callback";
pub const BASE_URL: &str = "https://auth.example.com";
/// base64("client-1:s3cret")
pub const BASIC_AUTH: &str = "Basic Y2xpZW50LTE6czNjcmV0";
pub const START: u64 = 1_700_000_000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kerliix_oauth=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn at(now: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(now)))
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Transport replaying queued responses and recording every request
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(status, body));
    }

    pub fn respond_json(&self, status: u16, body: serde_json::Value) {
        self.respond(status, body.to_string());
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> kerliix_oauth::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        // Let concurrent callers interleave as they would on a real socket
        tokio::task::yield_now().await;
        let next = self.responses.lock().unwrap().pop_front();
        next.ok_or_else(|| OAuthError::http("connection reset by peer"))
    }
}

pub fn confidential_config() -> ClientConfig {
    ClientConfig::builder()
        .client_id(CLIENT_ID)
        .client_secret(SECRET)
        .redirect_uri(REDIRECT_URI)
        .base_url(BASE_URL)
        .build()
}

pub fn public_config() -> ClientConfig {
    ClientConfig::builder()
        .client_id(CLIENT_ID)
        .redirect_uri(REDIRECT_URI)
        .base_url(BASE_URL)
        .build()
}

pub fn client_with(
    config: ClientConfig,
    transport: &Arc<ScriptedTransport>,
    clock: &Arc<ManualClock>,
) -> OAuthClient {
    init_tracing();
    OAuthClient::builder(config)
        .transport(transport.clone())
        .clock(clock.clone())
        .build()
        .unwrap()
}
