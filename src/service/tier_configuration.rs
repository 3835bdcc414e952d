use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::domain::object::compact;
use crate::domain::{Request, TierConfiguration};
use crate::error::Result;
use crate::http::HttpClient;
use crate::transition::{Continuation, RequestFamily, TransitionEngine};

/// Tier-configuration requests: `tier/config-requests/{id}`, items under `tier/configs/{id}`.
pub struct TierConfigRequests;

impl RequestFamily for TierConfigRequests {
    const NAME: &'static str = "tier_configuration";
    const REQUESTS: &'static str = "tier/config-requests";
    const ITEMS: &'static str = "tier/configs";

    type Item = TierConfiguration;

    /// `{"template": {"id": ..., "effective_date": ...}}`. Tier activation has no tile.
    fn approve_payload(
        template_id: &str,
        _activation_tile: Option<&str>,
        effective_date: Option<&str>,
    ) -> Map<String, Value> {
        let mut template = Map::new();
        template.insert("id".to_string(), json!(template_id));
        template.insert("effective_date".to_string(), json!(effective_date));

        let mut payload = Map::new();
        payload.insert("template".to_string(), Value::Object(compact(template)));
        payload
    }

    fn inquire_payload(_template_id: Option<&str>) -> Map<String, Value> {
        Map::new()
    }

    fn parameters_body(parameters: Vec<Value>) -> Value {
        json!({ "params": parameters })
    }

    fn item(request: &Request) -> Option<TierConfiguration> {
        request.tier_configuration()
    }

    fn with_item(request: Request, item: TierConfiguration) -> Request {
        request.with_tier_configuration(item)
    }
}

/// Transitions tier-configuration fulfillment requests.
pub type TierConfigTransitionService<H> = TransitionEngine<TierConfigRequests, H>;

/// Operations on tier configurations and their fulfillment requests.
#[async_trait]
pub trait TierConfigurationManagementService: Send + Sync {
    /// Fetch a tier configuration by id (`TC-XXXX-XXXX-XXXX`).
    async fn find_tier_configuration(
        &self,
        tier_configuration_id: &str,
    ) -> Result<TierConfiguration>;

    /// Fetch a tier-configuration request by id (`TCR-XXXX-XXXX-XXXX-NNN`).
    async fn find_tier_configuration_request(&self, request_id: &str) -> Result<Request>;

    async fn approve_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        effective_date: Option<&str>,
        continuation: Continuation<'_, R>,
    ) -> Result<R>;

    async fn fail_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        reason: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R>;

    async fn inquire_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        continuation: Continuation<'_, R>,
    ) -> Result<R>;

    /// Update the tier-configuration parameters without changing the request status.
    async fn update_tier_configuration_request_parameters<R: Send>(
        &self,
        request: Request,
        parameters: Vec<Value>,
        continuation: Continuation<'_, R>,
    ) -> Result<R>;
}

#[async_trait]
impl<H: HttpClient + 'static> TierConfigurationManagementService for TierConfigTransitionService<H> {
    async fn find_tier_configuration(
        &self,
        tier_configuration_id: &str,
    ) -> Result<TierConfiguration> {
        self.find_item(tier_configuration_id).await
    }

    async fn find_tier_configuration_request(&self, request_id: &str) -> Result<Request> {
        self.find_request(request_id).await
    }

    async fn approve_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        effective_date: Option<&str>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.approve(request, template_id, None, effective_date, continuation)
            .await
    }

    async fn fail_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        reason: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.fail(request, reason, continuation).await
    }

    async fn inquire_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.inquire(request, None, continuation).await
    }

    async fn update_tier_configuration_request_parameters<R: Send>(
        &self,
        request: Request,
        parameters: Vec<Value>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.update_parameters(request, parameters, continuation)
            .await
    }
}
