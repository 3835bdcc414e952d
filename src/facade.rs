//! One object exposing every asset and tier-configuration operation.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ClientConfig, ConnectClient};
use crate::domain::{Asset, Request, TierConfiguration};
use crate::error::Result;
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::service::{
    AssetManagementService, AssetTransitionService, TierConfigTransitionService,
    TierConfigurationManagementService,
};
use crate::transition::Continuation;

/// Facade over both request families, sharing one client handle.
///
/// # Example
/// ```no_run
/// use connect_facades::{
///     AssetManagementService, ClientConfig, ConnectFacade, Continuation,
/// };
///
/// # async fn run() -> connect_facades::Result<()> {
/// let facade = ConnectFacade::connect(&ClientConfig {
///     api_key: "ApiKey SU-000-000-000:secret".to_string(),
///     ..Default::default()
/// })?;
///
/// let request = facade.find_asset_request("PR-8027-7606-7082-001").await?;
/// let request = facade
///     .approve_asset_request(request, "TL-662-440-096", None, None, Continuation::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ConnectFacade<H: HttpClient> {
    client: ConnectClient<H>,
    assets: AssetTransitionService<H>,
    tier_configurations: TierConfigTransitionService<H>,
}

impl ConnectFacade<ReqwestHttpClient> {
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(ConnectClient::new(config)?))
    }
}

impl<H: HttpClient> ConnectFacade<H> {
    pub fn new(client: ConnectClient<H>) -> Self {
        Self {
            assets: AssetTransitionService::new(client.clone()),
            tier_configurations: TierConfigTransitionService::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &ConnectClient<H> {
        &self.client
    }

    pub fn assets(&self) -> &AssetTransitionService<H> {
        &self.assets
    }

    pub fn tier_configurations(&self) -> &TierConfigTransitionService<H> {
        &self.tier_configurations
    }
}

#[async_trait]
impl<H: HttpClient + 'static> AssetManagementService for ConnectFacade<H> {
    async fn find_asset(&self, asset_id: &str) -> Result<Asset> {
        self.assets.find_asset(asset_id).await
    }

    async fn find_asset_request(&self, request_id: &str) -> Result<Request> {
        self.assets.find_asset_request(request_id).await
    }

    async fn approve_asset_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        activation_tile: Option<&str>,
        effective_date: Option<&str>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.assets
            .approve_asset_request(
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
        self.assets
            .fail_asset_request(request, reason, continuation)
            .await
    }

    async fn inquire_asset_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.assets
            .inquire_asset_request(request, template_id, continuation)
            .await
    }

    async fn update_asset_request_parameters<R: Send>(
        &self,
        request: Request,
        parameters: Vec<Value>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.assets
            .update_asset_request_parameters(request, parameters, continuation)
            .await
    }
}

#[async_trait]
impl<H: HttpClient + 'static> TierConfigurationManagementService for ConnectFacade<H> {
    async fn find_tier_configuration(
        &self,
        tier_configuration_id: &str,
    ) -> Result<TierConfiguration> {
        self.tier_configurations
            .find_tier_configuration(tier_configuration_id)
            .await
    }

    async fn find_tier_configuration_request(&self, request_id: &str) -> Result<Request> {
        self.tier_configurations
            .find_tier_configuration_request(request_id)
            .await
    }

    async fn approve_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        template_id: &str,
        effective_date: Option<&str>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.tier_configurations
            .approve_tier_configuration_request(request, template_id, effective_date, continuation)
            .await
    }

    async fn fail_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        reason: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.tier_configurations
            .fail_tier_configuration_request(request, reason, continuation)
            .await
    }

    async fn inquire_tier_configuration_request<R: Send>(
        &self,
        request: Request,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.tier_configurations
            .inquire_tier_configuration_request(request, continuation)
            .await
    }

    async fn update_tier_configuration_request_parameters<R: Send>(
        &self,
        request: Request,
        parameters: Vec<Value>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.tier_configurations
            .update_tier_configuration_request_parameters(request, parameters, continuation)
            .await
    }
}
