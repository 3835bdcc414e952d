//! Assets and tier configurations: the items a fulfillment request is about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::object::{BusinessObject, SubResource};

/// A subscription asset (`AS-XXXX-XXXX-XXXX`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(Map<String, Value>);

impl Asset {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BusinessObject for Asset {
    fn from_map(raw: Map<String, Value>) -> Self {
        Asset(raw)
    }

    fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }
}

impl SubResource for Asset {}

/// A tier configuration (`TC-XXXX-XXXX-XXXX`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierConfiguration(Map<String, Value>);

impl TierConfiguration {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BusinessObject for TierConfiguration {
    fn from_map(raw: Map<String, Value>) -> Self {
        TierConfiguration(raw)
    }

    fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }
}

impl SubResource for TierConfiguration {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_param_updates_existing_parameter() {
        let asset = Asset::from_map(
            json!({
                "id": "AS-0000-0000-0001",
                "params": [{"id": "CAT_SUBSCRIPTION_ID", "name": "Subscription", "value": ""}]
            })
            .as_object()
            .cloned()
            .unwrap(),
        );

        let asset = asset.with_param("CAT_SUBSCRIPTION_ID", "AS-8790-0160-2196");

        assert_eq!(asset.params().len(), 1);
        assert_eq!(
            asset.param("CAT_SUBSCRIPTION_ID", "value"),
            Some(&json!("AS-8790-0160-2196"))
        );
        // Metadata is kept
        assert_eq!(
            asset.param("CAT_SUBSCRIPTION_ID", "name"),
            Some(&json!("Subscription"))
        );
    }

    #[test]
    fn test_with_param_appends_missing_parameter() {
        let config = TierConfiguration::new()
            .with_id("TC-0000-0000-0000")
            .with_param("PARAM_A", "a")
            .with_param("PARAM_B", "b");

        assert_eq!(config.params().len(), 2);
        assert_eq!(config.param("PARAM_B", "value"), Some(&json!("b")));
        assert_eq!(config.param("PARAM_C", "value"), None);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({"id": "AS-1", "status": "active", "marketplace": {"id": "MP-1"}});
        let asset: Asset = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(asset.status(), Some("active"));
        assert_eq!(asset.raw(), raw);
    }
}
