//! Error types for the Connect facades.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the facade error type.
pub type Result<T> = std::result::Result<T, FacadeError>;

/// Main error type for the facades.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// The remote API rejected a call, or the call never produced a usable response.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Invalid client configuration (e.g. an API key that is not a valid header value)
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// General error from anyhow, typically produced by a caller's `on_error` handler
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FacadeError {
    /// Borrow the remote error, if this is one.
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            FacadeError::Client(e) => Some(e),
            _ => None,
        }
    }
}

/// Error raised by the resource client for any failed remote call.
///
/// Carries the Connect error envelope: `error_code` and the list of `errors`
/// detail strings. Transport failures (connection refused, timeouts, bodies
/// that are not JSON) use the same shape without a status code.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    pub status_code: Option<u16>,
    pub error_code: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Error body returned by the Connect API on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    error_code: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

impl ClientError {
    pub fn new(
        message: impl Into<String>,
        status_code: u16,
        error_code: impl Into<String>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            message: message.into(),
            status_code: Some(status_code),
            error_code: Some(error_code.into()),
            errors,
        }
    }

    /// Failure below HTTP semantics: nothing came back from the server.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            error_code: None,
            errors: Vec::new(),
        }
    }

    /// Build the error for a non-2xx response.
    ///
    /// The message follows the `"<code> <reason>"` convention (e.g. `400 Bad Request`);
    /// `error_code` and `errors` are read from the body when it is a Connect error envelope.
    pub fn from_response(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).unwrap_or_default();
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status");

        Self {
            message: format!("{} {}", status, reason),
            status_code: Some(status),
            error_code: envelope.error_code,
            errors: envelope.errors,
        }
    }
}
