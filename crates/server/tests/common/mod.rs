//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock storage and registrar injected, so the upload flow can be
//! exercised over HTTP without external infrastructure.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use dropqueue_core::{
    testing::{MockRegistrar, MockStorage},
    Config, QueueConfig, RecordRegistrar, ServerConfig, StorageTransport,
};
use dropqueue_server::api::{create_router, WsBroadcaster};
use dropqueue_server::state::AppState;

/// Re-export fixtures for test convenience
pub use dropqueue_core::testing::fixtures;

const BOUNDARY: &str = "dropqueue-test-boundary";

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_stage_file() {
///     let fixture = TestFixture::new();
///
///     let response = fixture
///         .upload(&[("a.txt", "text/plain", b"hello")])
///         .await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock storage transport - inject failures and delays
    pub storage: Arc<MockStorage>,
    /// Mock registrar - inspect created records
    pub registrar: Arc<MockRegistrar>,
    /// Broadcaster shared with the orchestrator
    pub ws_broadcaster: WsBroadcaster,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Raw response, for non-JSON bodies
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestFixture {
    /// Create a new test fixture with default queue settings.
    pub fn new() -> Self {
        Self::with_queue_config(QueueConfig::default())
    }

    /// Create a test fixture with custom queue settings.
    pub fn with_queue_config(queue: QueueConfig) -> Self {
        let storage = Arc::new(MockStorage::new());
        let registrar = Arc::new(MockRegistrar::new());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            queue,
            ..Default::default()
        };

        let ws_broadcaster = WsBroadcaster::default();
        let state = Arc::new(AppState::with_backends(
            config,
            Arc::clone(&storage) as Arc<dyn StorageTransport>,
            Arc::clone(&registrar) as Arc<dyn RecordRegistrar>,
            ws_broadcaster.clone(),
        ));

        Self {
            router: create_router(state),
            storage,
            registrar,
            ws_broadcaster,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path).await
    }

    /// Stage files through a multipart POST to /api/v1/queue.
    pub async fn upload(&self, files: &[(&str, &str, &[u8])]) -> TestResponse {
        let mut body = Vec::new();
        for (name, mime_type, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    BOUNDARY, name, mime_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        self.multipart("/api/v1/queue", body).await
    }

    /// Send a raw multipart body.
    pub async fn multipart(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let raw = self.send(request).await;
        TestResponse {
            status: raw.status,
            body: parse_json(&raw.body),
        }
    }

    /// Stage one file and return its id.
    pub async fn stage(&self, name: &str, mime_type: &str, bytes: &[u8]) -> String {
        let response = self.upload(&[(name, mime_type, bytes)]).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["items"][0]["id"]
            .as_str()
            .expect("staged item has an id")
            .to_string()
    }

    /// Send a GET request and keep the raw body.
    pub async fn get_raw(&self, path: &str) -> RawResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let raw = self.send(request).await;
        TestResponse {
            status: raw.status,
            body: parse_json(&raw.body),
        }
    }

    async fn send(&self, request: Request<Body>) -> RawResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        RawResponse {
            status,
            content_type,
            body,
        }
    }
}

fn parse_json(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap_or(Value::Null)
    }
}
