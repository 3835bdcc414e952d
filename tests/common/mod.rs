#![allow(dead_code)]

use std::sync::Arc;

use connect_facades::http::{HttpResponse, MockHttpClient};
use connect_facades::{ConnectClient, ConnectFacade, Request};
use serde_json::json;

pub const BAD_REQUEST_400: &str = "400 Bad Request";

/// Facade over a mock transport, plus the mock to script and inspect it.
pub fn facade() -> (Arc<MockHttpClient>, ConnectFacade<MockHttpClient>) {
    let http = Arc::new(MockHttpClient::new());
    let facade = ConnectFacade::new(ConnectClient::with_client(http.clone()));
    (http, facade)
}

pub fn load_request(fixture: &str) -> Request {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), fixture);
    let raw = std::fs::read_to_string(&path).expect("Failed to read fixture");
    serde_json::from_str(&raw).expect("Fixture is not a valid request")
}

pub fn respond_with(http: &MockHttpClient, key: &str, body: serde_json::Value) {
    http.add_response(key, Ok(HttpResponse::ok(body.to_string())));
}

/// Script a Connect error envelope for `key`.
pub fn respond_with_error(
    http: &MockHttpClient,
    key: &str,
    status: u16,
    error_code: &str,
    errors: &[&str],
) {
    http.add_response(
        key,
        Ok(HttpResponse {
            status,
            body: json!({ "error_code": error_code, "errors": errors }).to_string(),
        }),
    );
}
