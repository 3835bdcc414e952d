//! HTTP client abstraction for talking to the Connect API.
//!
//! This module defines the `HttpClient` trait to abstract HTTP request execution,
//! enabling testability with mock implementations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::client::ClientConfig;
use crate::error::{ClientError, FacadeError, Result};

/// One call against the API, relative to the configured endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    /// HTTP method (e.g. "GET", "POST", "PUT")
    pub method: String,
    /// Path below the endpoint (e.g. "/requests/PR-0000-0000-0000-001/approve")
    pub path: String,
    /// JSON body, if any
    pub body: Option<String>,
}

impl ApiCall {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: String) -> Self {
        Self {
            method: "POST".to_string(),
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: String) -> Self {
        Self {
            method: "PUT".to_string(),
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Response from an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as a string
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for executing HTTP requests.
///
/// Non-2xx responses are still `Ok` here; turning them into [`ClientError`]s is the
/// resource client's job. `Err` means no response was obtained at all.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, call: &ApiCall) -> std::result::Result<HttpResponse, ClientError>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production HTTP client using reqwest.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Create a client for the configured endpoint.
    ///
    /// The API key is sent verbatim in the `Authorization` header on every call.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !config.api_key.is_empty() {
            let mut value = HeaderValue::from_str(&config.api_key).map_err(|e| {
                FacadeError::Configuration(format!("api_key is not a valid header value: {}", e))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            FacadeError::Configuration(format!("user_agent is not a valid header value: {}", e))
        })?;
        headers.insert(USER_AGENT, user_agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, call), fields(method = %call.method, path = %call.path))]
    async fn execute(&self, call: &ApiCall) -> std::result::Result<HttpResponse, ClientError> {
        let url = format!("{}{}", self.endpoint, call.path);

        tracing::debug!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "Executing HTTP request");

        let method = call.method.parse::<reqwest::Method>().map_err(|e| {
            tracing::error!(method = %call.method, error = %e, "Invalid HTTP method");
            ClientError::transport(format!("Invalid HTTP method '{}': {}", call.method, e))
        })?;

        let mut req = self.client.request(method, &url).timeout(self.timeout);

        if let Some(body) = &call.body {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
            tracing::trace!(body_len = body.len(), "Added request body");
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "HTTP request failed");
            ClientError::transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;

        tracing::debug!(status, response_len = body.len(), "HTTP request completed");

        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Mock HTTP client for testing.
///
/// Allows configuring predetermined responses for specific calls without
/// making actual HTTP calls.
///
/// # Example
/// ```
/// use connect_facades::http::{HttpResponse, MockHttpClient};
///
/// let mock = MockHttpClient::new();
/// mock.add_response(
///     "POST /requests/PR-0000-0000-0000-001/approve",
///     Ok(HttpResponse::ok(r#"{"id":"PR-0000-0000-0000-001","status":"approved"}"#)),
/// );
/// ```
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, VecDeque<std::result::Result<HttpResponse, ClientError>>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// Record of a call made to the mock HTTP client.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub method: String,
    pub path: String,
    pub body: Option<String>,
}

impl MockCall {
    /// Parse the recorded body as JSON (`Null` when the call had no body).
    pub fn json(&self) -> serde_json::Value {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(serde_json::Value::Null)
    }
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predetermined response for a specific method and path.
    ///
    /// The key is formatted as "{method} {path}". Multiple responses can be
    /// added for the same key - they will be returned in FIFO order.
    pub fn add_response(&self, key: &str, response: std::result::Result<HttpResponse, ClientError>) {
        self.responses
            .lock()
            .entry(key.to_string())
            .or_default()
            .push_back(response);
    }

    /// Get all calls that have been made to this mock client.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, call: &ApiCall) -> std::result::Result<HttpResponse, ClientError> {
        self.calls.lock().push(MockCall {
            method: call.method.clone(),
            path: call.path.clone(),
            body: call.body.clone(),
        });

        let key = format!("{} {}", call.method, call.path);
        let response = self
            .responses
            .lock()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());

        response.unwrap_or_else(|| {
            Err(ClientError::transport(format!(
                "No mock response configured for {}",
                key
            )))
        })
    }
}
