//! Fulfillment requests and their status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::object::BusinessObject;
use super::resources::{Asset, TierConfiguration};

/// Status label of a fulfillment request.
///
/// Labels this crate does not transition to are carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    Pending,
    Approved,
    Inquiring,
    Failed,
    Other(String),
}

impl RequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Inquiring => "inquiring",
            RequestStatus::Failed => "failed",
            RequestStatus::Other(label) => label,
        }
    }
}

impl From<&str> for RequestStatus {
    fn from(label: &str) -> Self {
        match label {
            "pending" => RequestStatus::Pending,
            "approved" => RequestStatus::Approved,
            "inquiring" => RequestStatus::Inquiring,
            "failed" => RequestStatus::Failed,
            other => RequestStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for RequestStatus {
    fn from(label: String) -> Self {
        RequestStatus::from(label.as_str())
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for RequestStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RequestStatus::from(s))
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for RequestStatus {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

const ASSET: &str = "asset";
const CONFIGURATION: &str = "configuration";

/// A fulfillment request (`PR-XXXX-XXXX-XXXX-NNN` for assets,
/// `TCR-XXXX-XXXX-XXXX-NNN` for tier configurations).
///
/// Setters consume and return the request so updates read as a chain:
///
/// ```
/// use connect_facades::{Asset, BusinessObject, Request, RequestStatus};
///
/// let request = Request::new()
///     .with_id("PR-8027-7606-7082-001")
///     .with_type("purchase")
///     .with_status(RequestStatus::Pending)
///     .with_asset(Asset::new().with_id("AS-8027-7606-7082"));
///
/// assert_eq!(request.status(), Some(RequestStatus::Pending));
/// assert_eq!(request.asset().unwrap().id(), Some("AS-8027-7606-7082"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Request(Map<String, Value>);

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_type(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn with_type(self, request_type: impl Into<String>) -> Self {
        self.with_field("type", Value::String(request_type.into()))
    }

    pub fn status(&self) -> Option<RequestStatus> {
        self.get_str("status").map(RequestStatus::from)
    }

    pub fn with_status(self, status: RequestStatus) -> Self {
        self.with_field("status", Value::String(status.into()))
    }

    pub fn reason(&self) -> Option<&str> {
        self.get_str("reason")
    }

    pub fn with_reason(self, reason: impl Into<String>) -> Self {
        self.with_field("reason", Value::String(reason.into()))
    }

    pub fn asset(&self) -> Option<Asset> {
        self.sub_resource(ASSET).map(Asset::from_map)
    }

    pub fn with_asset(self, asset: Asset) -> Self {
        self.with_field(ASSET, asset.raw())
    }

    pub fn tier_configuration(&self) -> Option<TierConfiguration> {
        self.sub_resource(CONFIGURATION)
            .map(TierConfiguration::from_map)
    }

    pub fn with_tier_configuration(self, configuration: TierConfiguration) -> Self {
        self.with_field(CONFIGURATION, configuration.raw())
    }

    fn sub_resource(&self, key: &str) -> Option<Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object).cloned()
    }
}

impl BusinessObject for Request {
    fn from_map(raw: Map<String, Value>) -> Self {
        Request(raw)
    }

    fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }
}
