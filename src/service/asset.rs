use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::domain::{Asset, Request};
use crate::error::Result;
use crate::http::HttpClient;
use crate::transition::{Continuation, RequestFamily, TransitionEngine};

const TEMPLATE_ID: &str = "template_id";
const ACTIVATION_TILE: &str = "activation_tile";
const EFFECTIVE_DATE: &str = "effective_date";

/// Asset fulfillment requests: `requests/{id}`, items under `assets/{id}`.
pub struct AssetRequests;

impl RequestFamily for AssetRequests {
    const NAME: &'static str = "asset";
    const REQUESTS: &'static str = "requests";
    const ITEMS: &'static str = "assets";

    type Item = Asset;

    fn approve_payload(
        template_id: &str,
        activation_tile: Option<&str>,
        effective_date: Option<&str>,
    ) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(TEMPLATE_ID.to_string(), json!(template_id));
        payload.insert(ACTIVATION_TILE.to_string(), json!(activation_tile));
        payload.insert(EFFECTIVE_DATE.to_string(), json!(effective_date));
        payload
    }

    fn inquire_payload(template_id: Option<&str>) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(TEMPLATE_ID.to_string(), json!(template_id));
        payload
    }

    fn parameters_body(parameters: Vec<Value>) -> Value {
        json!({ "asset": { "params": parameters } })
    }

    fn item(request: &Request) -> Option<Asset> {
        request.asset()
    }

    fn with_item(request: Request, item: Asset) -> Request {
        request.with_asset(item)
    }
}

/// Transitions asset fulfillment requests.
pub type AssetTransitionService<H> = TransitionEngine<AssetRequests, H>;

/// Operations on assets and their fulfillment requests.
///
/// Every transition takes a trailing [`Continuation`]; pass
/// `Continuation::default()` to get the updated [`Request`] back and have remote
/// errors returned unchanged.
#[async_trait]
pub trait AssetManagementService: Send + Sync {
    /// Fetch an asset by id (`AS-XXXX-XXXX-XXXX`).
    async fn find_asset(&self, asset_id: &str) -> Result<Asset>;

    /// Fetch an asset request by id (`PR-XXXX-XXXX-XXXX-NNN`).
    async fn find_asset_request(&self, request_id: &str) -> Result<Request>;

    /// Approve the request with the given template. Absent optionals are not sent.
    async fn approve_asset_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        activation_tile: Option<&str>,
        effective_date: Option<&str>,
        continuation: Continuation<'_, R>,
    ) -> Result<R>;

    /// Fail the request. The reason is set once the server confirms the call.
    async fn fail_asset_request<R: Send>(
        &self,
        request: Request,
        reason: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R>;

    /// Move the request to inquiring, rendering the given template to the customer.
    async fn inquire_asset_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R>;

    /// Update the asset parameters (`[{"id": ..., "value": ...}, ...]`) without
    /// changing the request status.
    async fn update_asset_request_parameters<R: Send>(
        &self,
        request: Request,
        parameters: Vec<Value>,
        continuation: Continuation<'_, R>,
    ) -> Result<R>;
}

#[async_trait]
impl<H: HttpClient + 'static> AssetManagementService for AssetTransitionService<H> {
    async fn find_asset(&self, asset_id: &str) -> Result<Asset> {
        self.find_item(asset_id).await
    }

    async fn find_asset_request(&self, request_id: &str) -> Result<Request> {
        self.find_request(request_id).await
    }

    async fn approve_asset_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        activation_tile: Option<&str>,
        effective_date: Option<&str>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.approve(
            request,
            template_id,
            activation_tile,
            effective_date,
            continuation,
        )
        .await
    }

    async fn fail_asset_request<R: Send>(
        &self,
        request: Request,
        reason: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.fail(request, reason, continuation).await
    }

    async fn inquire_asset_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.inquire(request, Some(template_id), continuation).await
    }

    async fn update_asset_request_parameters<R: Send>(
        &self,
        request: Request,
        parameters: Vec<Value>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.update_parameters(request, parameters, continuation)
            .await
    }
}
