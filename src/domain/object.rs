//! Shared plumbing for business objects backed by a raw JSON mapping.

use serde_json::{Map, Value};

use crate::error::ClientError;

/// A typed view over a raw Connect JSON object.
///
/// Implementors keep the full mapping, so fields this crate knows nothing about
/// survive a round trip through `raw()`.
pub trait BusinessObject: Sized {
    fn from_map(raw: Map<String, Value>) -> Self;

    fn as_map(&self) -> &Map<String, Value>;

    fn as_map_mut(&mut self) -> &mut Map<String, Value>;

    /// The underlying mapping as a JSON value.
    fn raw(&self) -> Value {
        Value::Object(self.as_map().clone())
    }

    fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    fn with_id(self, id: impl Into<String>) -> Self {
        self.with_field("id", Value::String(id.into()))
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.as_map().get(key).and_then(Value::as_str)
    }

    fn with_field(mut self, key: &str, value: Value) -> Self {
        self.as_map_mut().insert(key.to_string(), value);
        self
    }

    /// Wrap a remote response. Anything but a JSON object is an invalid response.
    fn from_response(value: Value) -> Result<Self, ClientError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(ClientError::transport(format!(
                "Expected a JSON object in response, got: {}",
                other
            ))),
        }
    }
}

/// A sub-resource attached to a request: an asset or a tier configuration.
///
/// Both carry a free-form status and a `params` list of `{id, value, ...}` objects.
pub trait SubResource: BusinessObject {
    fn status(&self) -> Option<&str> {
        self.get_str("status")
    }

    fn with_status(self, status: impl Into<String>) -> Self {
        self.with_field("status", Value::String(status.into()))
    }

    fn params(&self) -> &[Value] {
        self.as_map()
            .get("params")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up one field of a parameter, e.g. `param("CAT_SUBSCRIPTION_ID", "value")`.
    fn param(&self, id: &str, field: &str) -> Option<&Value> {
        self.params()
            .iter()
            .find(|p| p.get("id").and_then(Value::as_str) == Some(id))
            .and_then(|p| p.get(field))
    }

    /// Set a parameter's value, appending the parameter when it does not exist yet.
    fn with_param(mut self, id: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let params = self
            .as_map_mut()
            .entry("params")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !params.is_array() {
            *params = Value::Array(Vec::new());
        }
        if let Value::Array(params) = params {
            match params
                .iter_mut()
                .find(|p| p.get("id").and_then(Value::as_str) == Some(id))
            {
                Some(Value::Object(param)) => {
                    param.insert("value".to_string(), value);
                }
                _ => {
                    let mut param = Map::new();
                    param.insert("id".to_string(), Value::String(id.to_string()));
                    param.insert("value".to_string(), value);
                    params.push(Value::Object(param));
                }
            }
        }
        self
    }
}

/// Drop `null` entries from a payload object. Optional fields are omitted rather
/// than sent as null.
pub fn compact(payload: Map<String, Value>) -> Map<String, Value> {
    payload.into_iter().filter(|(_, v)| !v.is_null()).collect()
}
