//! Test harness for dispatch tests against local HTTP mocks.
//!
//! The `TestHarness` struct starts an axum server on a loopback port that
//! plays both the OAuth2 token endpoint and the Graph sendMail endpoint.
//! Each endpoint answers with a canned status and body, counts its hits and
//! records what it received.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path as UrlPath, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use secrecy::SecretString;
use tempfile::TempDir;
use tokio::net::TcpListener;

use graphmail::{DispatchStatus, MailDispatcher, MailerConfig, OAuthCredentials, StatusSink};

pub const CLIENT_ID: &str = "11111111-2222-3333-4444-555555555555";
pub const CLIENT_SECRET: &str = "s3cr3t~value";
pub const SCOPE: &str = "https://graph.microsoft.com/.default";
pub const SENDER: &str = "sender@example.com";
pub const ACCESS_TOKEN: &str = "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9.test";

/// A request captured by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("recorded body is not JSON")
    }

    /// Decodes a form-encoded body into key/value pairs.
    pub fn form(&self) -> Vec<(String, String)> {
        let url = reqwest::Url::parse(&format!("http://form.local/?{}", self.body))
            .expect("recorded body is not form-encoded");
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn form_value(&self, key: &str) -> Option<String> {
        self.form()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[derive(Clone)]
struct CannedResponse {
    status: StatusCode,
    body: String,
}

struct MockState {
    token_response: CannedResponse,
    send_response: CannedResponse,
    token_hits: AtomicUsize,
    send_hits: AtomicUsize,
    token_requests: Mutex<Vec<RecordedRequest>>,
    send_requests: Mutex<Vec<RecordedRequest>>,
}

fn record(headers: &HeaderMap, path: String, body: String) -> RecordedRequest {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    RecordedRequest {
        path,
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    }
}

async fn token_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.token_hits.fetch_add(1, Ordering::SeqCst);
    state
        .token_requests
        .lock()
        .unwrap()
        .push(record(&headers, "/oauth2/v2.0/token".to_string(), body));

    let canned = state.token_response.clone();
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
}

async fn send_mail_handler(
    State(state): State<Arc<MockState>>,
    UrlPath(sender): UrlPath<String>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.send_hits.fetch_add(1, Ordering::SeqCst);
    state.send_requests.lock().unwrap().push(record(
        &headers,
        format!("/v1.0/users/{}/sendMail", sender),
        body,
    ));

    let canned = state.send_response.clone();
    (canned.status, canned.body)
}

/// Configures the canned responses before the server starts.
pub struct TestHarnessBuilder {
    token_response: CannedResponse,
    send_response: CannedResponse,
}

impl TestHarnessBuilder {
    pub fn token_response(mut self, status: StatusCode, body: impl Into<String>) -> Self {
        self.token_response = CannedResponse {
            status,
            body: body.into(),
        };
        self
    }

    pub fn send_response(mut self, status: StatusCode, body: impl Into<String>) -> Self {
        self.send_response = CannedResponse {
            status,
            body: body.into(),
        };
        self
    }

    pub async fn start(self) -> TestHarness {
        let state = Arc::new(MockState {
            token_response: self.token_response,
            send_response: self.send_response,
            token_hits: AtomicUsize::new(0),
            send_hits: AtomicUsize::new(0),
            token_requests: Mutex::new(Vec::new()),
            send_requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/oauth2/v2.0/token", post(token_handler))
            .route("/v1.0/users/{sender}/sendMail", post(send_mail_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        TestHarness {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

/// Isolated environment: a mock server plus a temp directory for attachments.
pub struct TestHarness {
    temp_dir: TempDir,
    pub base_url: String,
    state: Arc<MockState>,
}

impl TestHarness {
    /// Token endpoint returns a valid token, Graph answers `202 Accepted`.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder {
            token_response: CannedResponse {
                status: StatusCode::OK,
                body: serde_json::json!({
                    "token_type": "Bearer",
                    "expires_in": 3599,
                    "access_token": ACCESS_TOKEN,
                })
                .to_string(),
            },
            send_response: CannedResponse {
                status: StatusCode::ACCEPTED,
                body: String::new(),
            },
        }
    }

    pub async fn start_default() -> Self {
        Self::builder().start().await
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.base_url)
    }

    pub fn graph_base_url(&self) -> String {
        format!("{}/v1.0", self.base_url)
    }

    pub fn attachment_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Configuration pointing at the mock server.
    pub fn config(&self) -> MailerConfig {
        self.config_with_endpoints(&self.token_endpoint(), &self.graph_base_url())
    }

    /// Like [`config`](Self::config), with either endpoint swapped out.
    pub fn config_with_endpoints(&self, token_endpoint: &str, graph_base_url: &str) -> MailerConfig {
        let creds = OAuthCredentials::new(
            token_endpoint,
            CLIENT_ID,
            SecretString::from(CLIENT_SECRET),
            SCOPE,
            "client_credentials",
        )
        .expect("Failed to build credentials");

        MailerConfig::new(creds, SENDER)
            .expect("Failed to build config")
            .with_graph_base_url(graph_base_url)
            .expect("Invalid mock base URL")
            .with_attachment_base_dir(self.attachment_dir())
    }

    /// JSON config file content pointing at the mock server.
    pub fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "version": "1.0",
            "tokenEndpoint": self.token_endpoint(),
            "clientId": CLIENT_ID,
            "clientSecret": CLIENT_SECRET,
            "scope": SCOPE,
            "senderEmailAddress": SENDER,
            "graphBaseUrl": self.graph_base_url(),
            "attachmentBaseDir": self.attachment_dir(),
        })
    }

    pub fn dispatcher(&self, status: Arc<dyn StatusSink>) -> MailDispatcher {
        MailDispatcher::new(Arc::new(self.config()), status)
    }

    /// Base URL of a loopback port nothing listens on.
    pub fn unreachable_base_url() -> String {
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind loopback port");
        let addr = listener.local_addr().expect("Failed to read local addr");
        drop(listener);
        format!("http://{}", addr)
    }

    /// Writes a file into the attachment directory and returns its path.
    pub fn write_attachment(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write attachment");
        path
    }

    pub fn token_hits(&self) -> usize {
        self.state.token_hits.load(Ordering::SeqCst)
    }

    pub fn send_hits(&self) -> usize {
        self.state.send_hits.load(Ordering::SeqCst)
    }

    pub fn token_requests(&self) -> Vec<RecordedRequest> {
        self.state.token_requests.lock().unwrap().clone()
    }

    pub fn send_requests(&self) -> Vec<RecordedRequest> {
        self.state.send_requests.lock().unwrap().clone()
    }

    pub fn last_send_request(&self) -> RecordedRequest {
        self.send_requests()
            .pop()
            .expect("sendMail endpoint was never called")
    }
}

/// Status sink that keeps every update in order.
#[derive(Default)]
pub struct RecordingStatus {
    updates: Mutex<Vec<DispatchStatus>>,
}

impl RecordingStatus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn updates(&self) -> Vec<DispatchStatus> {
        self.updates.lock().unwrap().clone()
    }

    pub fn last(&self) -> DispatchStatus {
        self.updates()
            .pop()
            .expect("status sink received no updates")
    }
}

impl StatusSink for RecordingStatus {
    fn update(&self, status: &DispatchStatus) {
        self.updates.lock().unwrap().push(status.clone());
    }
}
