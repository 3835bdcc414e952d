use std::marker::PhantomData;

use serde_json::{Map, Value, json};

use super::{Continuation, StatusTransition, TransitionAction};
use crate::client::ConnectClient;
use crate::domain::{BusinessObject, Request, SubResource};
use crate::error::{ClientError, Result};
use crate::http::HttpClient;

/// What differs between asset requests and tier-configuration requests.
///
/// Everything else about the transition protocol is shared by [`TransitionEngine`].
pub trait RequestFamily: Send + Sync + 'static {
    /// Label used in logs and metrics.
    const NAME: &'static str;

    /// Collection path of the requests (`requests`, `tier/config-requests`).
    const REQUESTS: &'static str;

    /// Collection path of the items the requests are about (`assets`, `tier/configs`).
    const ITEMS: &'static str;

    type Item: SubResource + Send;

    fn approve_payload(
        template_id: &str,
        activation_tile: Option<&str>,
        effective_date: Option<&str>,
    ) -> Map<String, Value>;

    fn inquire_payload(template_id: Option<&str>) -> Map<String, Value>;

    fn fail_payload(reason: &str) -> Map<String, Value> {
        object(json!({ "reason": reason }))
    }

    /// Body of the update call that replaces the item's parameters.
    fn parameters_body(parameters: Vec<Value>) -> Value;

    fn item(request: &Request) -> Option<Self::Item>;

    fn with_item(request: Request, item: Self::Item) -> Request;
}

/// Request lifecycle operations for one [`RequestFamily`].
pub struct TransitionEngine<F: RequestFamily, H: HttpClient> {
    transition: StatusTransition<H>,
    _family: PhantomData<fn() -> F>,
}

impl<F: RequestFamily, H: HttpClient> Clone for TransitionEngine<F, H> {
    fn clone(&self) -> Self {
        Self {
            transition: self.transition.clone(),
            _family: PhantomData,
        }
    }
}

impl<F: RequestFamily, H: HttpClient> TransitionEngine<F, H> {
    pub fn new(client: ConnectClient<H>) -> Self {
        Self {
            transition: StatusTransition::new(client, F::REQUESTS, F::NAME),
            _family: PhantomData,
        }
    }

    pub fn client(&self) -> &ConnectClient<H> {
        self.transition.client()
    }

    #[tracing::instrument(skip(self), fields(family = F::NAME))]
    pub async fn find_item(&self, id: &str) -> Result<F::Item> {
        let raw = self
            .client()
            .collection_path(F::ITEMS)
            .resource(id)
            .get()
            .await?;
        Ok(F::Item::from_response(raw)?)
    }

    #[tracing::instrument(skip(self), fields(family = F::NAME))]
    pub async fn find_request(&self, id: &str) -> Result<Request> {
        let raw = self
            .client()
            .collection_path(F::REQUESTS)
            .resource(id)
            .get()
            .await?;
        Ok(Request::from_response(raw)?)
    }

    pub async fn approve<R>(
        &self,
        request: Request,
        template_id: &str,
        activation_tile: Option<&str>,
        effective_date: Option<&str>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        let payload = F::approve_payload(template_id, activation_tile, effective_date);
        self.transition
            .transition(request, TransitionAction::Approve, payload, continuation)
            .await
    }

    pub async fn fail<R>(
        &self,
        request: Request,
        reason: &str,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.transition
            .transition(
                request,
                TransitionAction::Fail,
                F::fail_payload(reason),
                continuation,
            )
            .await
    }

    pub async fn inquire<R>(
        &self,
        request: Request,
        template_id: Option<&str>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        self.transition
            .transition(
                request,
                TransitionAction::Inquire,
                F::inquire_payload(template_id),
                continuation,
            )
            .await
    }

    /// Replace the parameters of the request's item. The status is left alone.
    ///
    /// The item returned by the server replaces the caller's item; every other
    /// field of the caller's request is kept.
    #[tracing::instrument(
        skip_all,
        fields(family = F::NAME, request_id = request.id().unwrap_or_default(), count = parameters.len())
    )]
    pub async fn update_parameters<R>(
        &self,
        request: Request,
        parameters: Vec<Value>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        let id = request.id().unwrap_or_default().to_string();

        let outcome = self
            .client()
            .collection_path(F::REQUESTS)
            .resource(&id)
            .update(&F::parameters_body(parameters))
            .await
            .and_then(Request::from_response)
            .and_then(|updated| {
                F::item(&updated).ok_or_else(|| {
                    ClientError::transport(format!(
                        "Update response for {} carries no {}",
                        id,
                        F::NAME
                    ))
                })
            });

        match outcome {
            Ok(item) => {
                tracing::info!("Request parameters updated");
                Ok(continuation.succeed(F::with_item(request, item)))
            }
            Err(error) => {
                tracing::warn!(
                    status_code = ?error.status_code,
                    error_code = ?error.error_code,
                    error = %error,
                    "Parameter update rejected"
                );
                continuation.fail(error)
            }
        }
    }
}

pub(crate) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
