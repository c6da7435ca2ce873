//! Shared test utilities for integration tests.

#![allow(dead_code)]

use bbrest::ApiClient;
use serde_json::{json, Value};
use wiremock::{MockServer, Request};

/// Password used by every test client. Contains a space so encoding is exercised.
pub const TEST_PASSWORD: &str = "s3cret pass";

/// The password as it must appear on the wire.
pub const ENCODED_PASSWORD: &str = "s3cret%20pass";

/// Create a client pointed at a mock server.
pub fn create_test_client(server: &MockServer) -> ApiClient {
    ApiClient::from_url(&server.uri(), TEST_PASSWORD).expect("failed to create test client")
}

/// A success envelope wrapping `data`.
pub fn success_envelope(data: Value) -> Value {
    json!({ "status": 200, "message": "Success", "data": data })
}

/// A paged success envelope.
pub fn paged_envelope(data: Value, limit: u64, offset: u64, total: u64) -> Value {
    json!({
        "status": 200,
        "message": "Success",
        "data": data,
        "metadata": { "limit": limit, "offset": offset, "total": total }
    })
}

/// Run a blocking call off the async test thread.
pub async fn run_blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

/// The single request a mock server received.
pub async fn only_request(server: &MockServer) -> Request {
    let mut requests = server
        .received_requests()
        .await
        .expect("request recording disabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

/// Content-Type header of a recorded request, if any.
pub fn content_type(request: &Request) -> Option<String> {
    request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
