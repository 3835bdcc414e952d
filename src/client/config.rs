use serde::{Deserialize, Serialize};

/// Connection settings for the Connect API.
///
/// Every field has a default, so partial documents deserialize:
///
/// ```
/// # use connect_facades::ClientConfig;
/// let config: ClientConfig =
///     serde_json::from_str(r#"{"api_key": "ApiKey SU-000-000-000:secret"}"#).unwrap();
/// assert_eq!(config.timeout_ms, 30_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every call path is appended to
    pub endpoint: String,

    /// Value of the `Authorization` header (`ApiKey SU-...:...`). Empty means no header.
    pub api_key: String,

    /// Timeout for each individual call in milliseconds
    pub timeout_ms: u64,

    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.connect.cloudblue.com/public/v1".to_string(),
            api_key: String::new(),
            timeout_ms: 30_000,
            user_agent: concat!("connect-facades/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
