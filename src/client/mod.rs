//! Resource-style client for the Connect API.
//!
//! Calls are addressed the way the API lays out its resources:
//!
//! ```text
//! client.collection("requests").resource(id).get()                         GET  /requests/{id}
//! client.collection("requests").resource(id).update(body)                  PUT  /requests/{id}
//! client.collection("requests").resource(id).action("approve").post(body)  POST /requests/{id}/approve
//! client.ns("tier").collection("config-requests").resource(id)...               /tier/config-requests/{id}
//! ```
//!
//! Every failure, whether the server answered with a non-2xx status or never
//! answered at all, comes back as a [`ClientError`]. A successful call whose body
//! is not JSON yields the body as a JSON string.

mod config;

pub use config::ClientConfig;

use std::sync::Arc;

use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::http::{ApiCall, HttpClient, HttpResponse, ReqwestHttpClient};

/// Result of a single remote call.
pub type CallResult = std::result::Result<Value, ClientError>;

/// Handle to the remote API. Cloning is cheap; clones share the transport.
pub struct ConnectClient<H: HttpClient> {
    http: Arc<H>,
}

impl<H: HttpClient> Clone for ConnectClient<H> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl ConnectClient<ReqwestHttpClient> {
    /// Build a client talking to a real Connect endpoint.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(Arc::new(ReqwestHttpClient::new(config)?)))
    }
}

impl<H: HttpClient> ConnectClient<H> {
    /// Build a client over any transport (e.g. a `MockHttpClient` in tests).
    pub fn with_client(http: Arc<H>) -> Self {
        Self { http }
    }

    pub fn http_client(&self) -> &Arc<H> {
        &self.http
    }

    /// A top-level collection such as `requests` or `assets`.
    pub fn collection(&self, name: &str) -> Collection<'_, H> {
        Collection {
            client: self,
            path: format!("/{}", name),
        }
    }

    /// A namespace grouping several collections, such as `tier`.
    pub fn ns(&self, name: &str) -> Namespace<'_, H> {
        Namespace {
            client: self,
            path: format!("/{}", name),
        }
    }

    /// Resolve a slash-separated collection path (`"requests"`, `"tier/config-requests"`).
    pub fn collection_path(&self, path: &str) -> Collection<'_, H> {
        Collection {
            client: self,
            path: format!("/{}", path.trim_matches('/')),
        }
    }

    async fn call(&self, call: ApiCall) -> CallResult {
        let response = self.http.execute(&call).await?;
        decode(response)
    }
}

pub struct Namespace<'a, H: HttpClient> {
    client: &'a ConnectClient<H>,
    path: String,
}

impl<'a, H: HttpClient> Namespace<'a, H> {
    pub fn collection(&self, name: &str) -> Collection<'a, H> {
        Collection {
            client: self.client,
            path: format!("{}/{}", self.path, name),
        }
    }
}

pub struct Collection<'a, H: HttpClient> {
    client: &'a ConnectClient<H>,
    path: String,
}

impl<'a, H: HttpClient> Collection<'a, H> {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Address one item of the collection. The id is not validated.
    pub fn resource(&self, id: &str) -> Resource<'a, H> {
        Resource {
            client: self.client,
            path: format!("{}/{}", self.path, id),
        }
    }
}

pub struct Resource<'a, H: HttpClient> {
    client: &'a ConnectClient<H>,
    path: String,
}

impl<'a, H: HttpClient> Resource<'a, H> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn get(&self) -> CallResult {
        self.client.call(ApiCall::get(self.path.clone())).await
    }

    /// Partial update of the resource.
    pub async fn update(&self, payload: &Value) -> CallResult {
        let body = encode(payload)?;
        self.client.call(ApiCall::put(self.path.clone(), body)).await
    }

    /// A named action on the resource, e.g. `approve`.
    pub fn action(&self, token: &str) -> Action<'a, H> {
        Action {
            client: self.client,
            path: format!("{}/{}", self.path, token),
        }
    }
}

pub struct Action<'a, H: HttpClient> {
    client: &'a ConnectClient<H>,
    path: String,
}

impl<H: HttpClient> Action<'_, H> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn post(&self, payload: &Value) -> CallResult {
        let body = encode(payload)?;
        self.client.call(ApiCall::post(self.path.clone(), body)).await
    }
}

fn encode(payload: &Value) -> std::result::Result<String, ClientError> {
    serde_json::to_string(payload)
        .map_err(|e| ClientError::transport(format!("Failed to encode payload: {}", e)))
}

fn decode(response: HttpResponse) -> CallResult {
    if !response.is_success() {
        let error = ClientError::from_response(response.status, &response.body);
        tracing::warn!(
            status = response.status,
            error_code = ?error.error_code,
            "Remote call rejected"
        );
        return Err(error);
    }

    if response.body.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    // The call went through; a body that is not JSON is kept as text and left
    // to the caller to interpret.
    Ok(serde_json::from_str(&response.body).unwrap_or_else(|e| {
        tracing::debug!(status = response.status, error = %e, "Response body is not JSON");
        Value::String(response.body)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockHttpClient;
    use serde_json::json;

    fn client() -> (Arc<MockHttpClient>, ConnectClient<MockHttpClient>) {
        let http = Arc::new(MockHttpClient::new());
        (http.clone(), ConnectClient::with_client(http))
    }

    #[test]
    fn test_paths() {
        let (_, client) = client();

        let resource = client.collection("requests").resource("PR-1");
        assert_eq!(resource.path(), "/requests/PR-1");
        assert_eq!(resource.action("approve").path(), "/requests/PR-1/approve");

        let tier = client.ns("tier").collection("config-requests");
        assert_eq!(tier.path(), "/tier/config-requests");
        assert_eq!(
            client.collection_path("tier/config-requests").path(),
            tier.path()
        );
    }

    #[tokio::test]
    async fn test_get_decodes_json() {
        let (http, client) = client();
        http.add_response(
            "GET /assets/AS-1",
            Ok(HttpResponse::ok(r#"{"id":"AS-1"}"#)),
        );

        let value = client.collection("assets").resource("AS-1").get().await.unwrap();
        assert_eq!(value, json!({"id": "AS-1"}));
    }

    #[tokio::test]
    async fn test_post_sends_payload_and_tolerates_empty_body() {
        let (http, client) = client();
        http.add_response(
            "POST /requests/PR-1/inquire",
            Ok(HttpResponse { status: 204, body: String::new() }),
        );

        let value = client
            .collection("requests")
            .resource("PR-1")
            .action("inquire")
            .post(&json!({"template_id": "TL-1"}))
            .await
            .unwrap();

        assert_eq!(value, json!({}));
        assert_eq!(http.get_calls()[0].json(), json!({"template_id": "TL-1"}));
    }

    #[tokio::test]
    async fn test_error_status_becomes_client_error() {
        let (http, client) = client();
        http.add_response(
            "PUT /requests/PR-1",
            Ok(HttpResponse {
                status: 400,
                body: r#"{"error_code":"REQ_003","errors":["Only pending requests can be updated."]}"#
                    .to_string(),
            }),
        );

        let error = client
            .collection("requests")
            .resource("PR-1")
            .update(&json!({}))
            .await
            .unwrap_err();

        assert_eq!(error.status_code, Some(400));
        assert_eq!(error.error_code.as_deref(), Some("REQ_003"));
        assert_eq!(error.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_post_keeps_non_json_success_body_as_text() {
        let (http, client) = client();
        http.add_response("POST /requests/PR-1/approve", Ok(HttpResponse::ok("OK")));

        let value = client
            .collection("requests")
            .resource("PR-1")
            .action("approve")
            .post(&json!({"template_id": "TL-1"}))
            .await
            .unwrap();

        assert_eq!(value, json!("OK"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_still_an_error() {
        let (http, client) = client();
        http.add_response(
            "GET /assets/AS-1",
            Ok(HttpResponse {
                status: 503,
                body: "Service Unavailable".to_string(),
            }),
        );

        let error = client
            .collection("assets")
            .resource("AS-1")
            .get()
            .await
            .unwrap_err();

        assert_eq!(error.status_code, Some(503));
        assert_eq!(error.error_code, None);
    }
}
