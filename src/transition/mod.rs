//! The request-status transition protocol.
//!
//! A fulfillment request moves between statuses through action calls on the API:
//!
//! ```text
//! pending ──approve──> approved
//!    │
//!    ├────inquire──> inquiring ──approve──> approved
//!    │                   │
//!    └─────fail────> failed <───fail───────┘
//! ```
//!
//! [`StatusTransition`] performs exactly one such call and reconciles the local
//! request. The resulting status always comes from the fixed action table; the
//! local request is never touched before the remote call is confirmed.
//!
//! [`TransitionEngine`] builds the asset and tier-configuration operations on top
//! of it, driven by a [`RequestFamily`].

mod continuation;
mod engine;

pub use continuation::Continuation;
pub use engine::{RequestFamily, TransitionEngine};

use std::fmt;

use metrics::counter;
use serde_json::{Map, Value};

use crate::client::ConnectClient;
use crate::domain::object::compact;
use crate::domain::{BusinessObject, Request, RequestStatus};
use crate::error::Result;
use crate::http::HttpClient;

pub const APPROVE: &str = "approve";
pub const INQUIRE: &str = "inquire";
pub const FAIL: &str = "fail";

/// A status-changing action on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionAction {
    Approve,
    Inquire,
    Fail,
}

impl TransitionAction {
    /// Path segment of the action endpoint.
    pub fn token(&self) -> &'static str {
        match self {
            TransitionAction::Approve => APPROVE,
            TransitionAction::Inquire => INQUIRE,
            TransitionAction::Fail => FAIL,
        }
    }

    /// Status the request is in once the action is confirmed.
    pub fn resulting_status(&self) -> RequestStatus {
        match self {
            TransitionAction::Approve => RequestStatus::Approved,
            TransitionAction::Inquire => RequestStatus::Inquiring,
            TransitionAction::Fail => RequestStatus::Failed,
        }
    }
}

impl fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Issues action calls against one request collection.
pub struct StatusTransition<H: HttpClient> {
    client: ConnectClient<H>,
    collection: &'static str,
    family: &'static str,
}

impl<H: HttpClient> Clone for StatusTransition<H> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            collection: self.collection,
            family: self.family,
        }
    }
}

impl<H: HttpClient> StatusTransition<H> {
    /// `collection` is the request collection path (`requests`, `tier/config-requests`);
    /// `family` labels logs and metrics.
    pub fn new(client: ConnectClient<H>, collection: &'static str, family: &'static str) -> Self {
        Self {
            client,
            collection,
            family,
        }
    }

    pub fn client(&self) -> &ConnectClient<H> {
        &self.client
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Run `action` on `request`, then hand the outcome to `continuation`.
    ///
    /// `null` entries of `payload` are not sent. On success the request gets the
    /// action's resulting status; for `fail` its reason is taken from the confirmed
    /// response, or from the submitted payload when the response does not echo it.
    #[tracing::instrument(
        skip_all,
        fields(family = self.family, request_id = request.id().unwrap_or_default(), action = %action)
    )]
    pub async fn transition<R>(
        &self,
        request: Request,
        action: TransitionAction,
        payload: Map<String, Value>,
        continuation: Continuation<'_, R>,
    ) -> Result<R> {
        let payload = compact(payload);
        let id = request.id().unwrap_or_default().to_string();

        tracing::debug!(fields = payload.len(), "Sending status transition");

        let outcome = self
            .client
            .collection_path(self.collection)
            .resource(&id)
            .action(action.token())
            .post(&Value::Object(payload.clone()))
            .await;

        match outcome {
            Ok(response) => {
                counter!(
                    "connect_facade_transitions_total",
                    "family" => self.family,
                    "action" => action.token(),
                    "outcome" => "success"
                )
                .increment(1);

                let status = action.resulting_status();
                tracing::info!(status = %status, "Request transitioned");

                let mut request = request.with_status(status);
                if action == TransitionAction::Fail
                    && let Some(reason) = confirmed_reason(&response, &payload)
                {
                    request = request.with_reason(reason);
                }
                Ok(continuation.succeed(request))
            }
            Err(error) => {
                counter!(
                    "connect_facade_transitions_total",
                    "family" => self.family,
                    "action" => action.token(),
                    "outcome" => "error"
                )
                .increment(1);
                tracing::warn!(
                    status_code = ?error.status_code,
                    error_code = ?error.error_code,
                    error = %error,
                    "Status transition rejected"
                );
                continuation.fail(error)
            }
        }
    }
}

/// The reason the server recorded, falling back to the one that was submitted.
fn confirmed_reason(response: &Value, payload: &Map<String, Value>) -> Option<String> {
    response
        .get("reason")
        .and_then(Value::as_str)
        .or_else(|| payload.get("reason").and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, FacadeError};
    use crate::http::{HttpResponse, MockHttpClient};
    use serde_json::json;
    use std::sync::Arc;

    fn transition() -> (Arc<MockHttpClient>, StatusTransition<MockHttpClient>) {
        let http = Arc::new(MockHttpClient::new());
        let client = ConnectClient::with_client(http.clone());
        (http, StatusTransition::new(client, "requests", "asset"))
    }

    fn pending(id: &str) -> Request {
        Request::new().with_id(id).with_status(RequestStatus::Pending)
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_action_table() {
        assert_eq!(TransitionAction::Approve.resulting_status(), RequestStatus::Approved);
        assert_eq!(TransitionAction::Inquire.resulting_status(), RequestStatus::Inquiring);
        assert_eq!(TransitionAction::Fail.resulting_status(), RequestStatus::Failed);
        assert_eq!(TransitionAction::Inquire.to_string(), "inquire");
    }

    #[test_log::test(tokio::test)]
    async fn test_each_action_derives_status_from_table() {
        let actions = [
            TransitionAction::Approve,
            TransitionAction::Inquire,
            TransitionAction::Fail,
        ];
        for action in actions {
            let (http, transition) = transition();
            // The server's status is ignored in favour of the table
            http.add_response(
                &format!("POST /requests/PR-1/{}", action),
                Ok(HttpResponse::ok(r#"{"id":"PR-1","status":"draft"}"#)),
            );

            let request = transition
                .transition(pending("PR-1"), action, Map::new(), Continuation::default())
                .await
                .unwrap();

            assert_eq!(request.status(), Some(action.resulting_status()));
            assert_eq!(request.id(), Some("PR-1"));
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_null_payload_entries_are_not_sent() {
        let (http, transition) = transition();
        http.add_response("POST /requests/PR-1/approve", Ok(HttpResponse::ok("{}")));

        transition
            .transition(
                pending("PR-1"),
                TransitionAction::Approve,
                payload(json!({
                    "template_id": "TL-1",
                    "activation_tile": null,
                    "effective_date": "2024-01-01T00:00:00Z"
                })),
                Continuation::default(),
            )
            .await
            .unwrap();

        let sent = http.get_calls()[0].json();
        assert_eq!(
            sent,
            json!({"template_id": "TL-1", "effective_date": "2024-01-01T00:00:00Z"})
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_fail_takes_reason_from_response() {
        let (http, transition) = transition();
        http.add_response(
            "POST /requests/PR-1/fail",
            Ok(HttpResponse::ok(r#"{"id":"PR-1","status":"failed","reason":"Server side reason"}"#)),
        );

        let request = transition
            .transition(
                pending("PR-1"),
                TransitionAction::Fail,
                payload(json!({"reason": "Submitted reason"})),
                Continuation::default(),
            )
            .await
            .unwrap();

        assert_eq!(request.reason(), Some("Server side reason"));
    }

    #[test_log::test(tokio::test)]
    async fn test_fail_falls_back_to_submitted_reason() {
        let (http, transition) = transition();
        http.add_response("POST /requests/PR-1/fail", Ok(HttpResponse::ok("")));

        let request = transition
            .transition(
                pending("PR-1"),
                TransitionAction::Fail,
                payload(json!({"reason": "Submitted reason"})),
                Continuation::default(),
            )
            .await
            .unwrap();

        assert_eq!(request.reason(), Some("Submitted reason"));
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_id_surfaces_as_remote_error() {
        let (http, transition) = transition();
        http.add_response(
            "POST /requests//approve",
            Ok(HttpResponse {
                status: 404,
                body: r#"{"error_code":"NOT_FOUND","errors":["Not found."]}"#.to_string(),
            }),
        );

        let result = transition
            .transition(
                Request::new(),
                TransitionAction::Approve,
                Map::new(),
                Continuation::default(),
            )
            .await;

        let error = result.unwrap_err();
        assert_eq!(error.as_client_error().and_then(|e| e.status_code), Some(404));
    }

    #[test_log::test(tokio::test)]
    async fn test_error_goes_to_custom_handler() {
        let (http, transition) = transition();
        http.add_response(
            "POST /requests/PR-1/inquire",
            Err(ClientError::transport("connection refused")),
        );

        let result = transition
            .transition(
                pending("PR-1"),
                TransitionAction::Inquire,
                Map::new(),
                Continuation::on_success(|r: Request| r.status())
                    .on_error(|e| Err(FacadeError::Other(anyhow::anyhow!("wrapped: {}", e)))),
            )
            .await;

        match result {
            Err(FacadeError::Other(e)) => assert_eq!(e.to_string(), "wrapped: connection refused"),
            other => panic!("Expected mapped error, got {:?}", other),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_plain_text_confirmation_still_transitions() {
        let (http, transition) = transition();
        http.add_response("POST /requests/PR-1/approve", Ok(HttpResponse::ok("OK")));
        http.add_response("POST /requests/PR-2/fail", Ok(HttpResponse::ok("OK")));

        let approved = transition
            .transition(
                pending("PR-1"),
                TransitionAction::Approve,
                payload(json!({"template_id": "TL-1"})),
                Continuation::default(),
            )
            .await
            .unwrap();
        assert_eq!(approved.status(), Some(RequestStatus::Approved));

        let failed = transition
            .transition(
                pending("PR-2"),
                TransitionAction::Fail,
                payload(json!({"reason": "Submitted reason"})),
                Continuation::default(),
            )
            .await
            .unwrap();
        assert_eq!(failed.status(), Some(RequestStatus::Failed));
        assert_eq!(failed.reason(), Some("Submitted reason"));
    }

    #[test]
    fn test_outcomes_are_counted_per_family_and_action() {
        use metrics_util::debugging::{DebugValue, DebuggingRecorder};

        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let (http, transition) = transition();
                http.add_response("POST /requests/PR-1/approve", Ok(HttpResponse::ok("{}")));
                http.add_response(
                    "POST /requests/PR-2/fail",
                    Ok(HttpResponse {
                        status: 400,
                        body: r#"{"error_code":"REQ_005","errors":["Missed fields: reason."]}"#
                            .to_string(),
                    }),
                );

                transition
                    .transition(
                        pending("PR-1"),
                        TransitionAction::Approve,
                        Map::new(),
                        Continuation::default(),
                    )
                    .await
                    .unwrap();
                let rejected = transition
                    .transition(
                        pending("PR-2"),
                        TransitionAction::Fail,
                        Map::new(),
                        Continuation::default(),
                    )
                    .await;
                assert!(rejected.is_err());
            })
        });

        let counters: Vec<(Vec<(String, String)>, u64)> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter(|(key, _, _, _)| key.key().name() == "connect_facade_transitions_total")
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Counter(count) => Some((
                    key.key()
                        .labels()
                        .map(|label| (label.key().to_string(), label.value().to_string()))
                        .collect(),
                    count,
                )),
                _ => None,
            })
            .collect();

        let labels = |action: &str, outcome: &str| {
            vec![
                ("family".to_string(), "asset".to_string()),
                ("action".to_string(), action.to_string()),
                ("outcome".to_string(), outcome.to_string()),
            ]
        };
        assert_eq!(counters.len(), 2);
        assert!(counters.contains(&(labels("approve", "success"), 1)));
        assert!(counters.contains(&(labels("fail", "error"), 1)));
    }
}
