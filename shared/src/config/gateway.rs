//! SMS gateway configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gateway settings shared by every provider plus the per-region entries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Upper bound for a single gateway HTTP call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Pause between pages of a batch status query, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// One entry per region
    #[serde(default)]
    pub items: Vec<GatewayItemConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            page_delay_ms: default_page_delay_ms(),
            items: Vec::new(),
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Credentials and endpoint for one region's gateway
///
/// Every field is optional at the deserialization layer so a partially
/// filled entry can be reported and skipped instead of failing the whole
/// configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatewayItemConfig {
    /// ISO region code, e.g. `KR` or `PH`
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default, alias = "apikey")]
    pub api_key: Option<String>,

    #[serde(default, alias = "userid")]
    pub user_id: Option<String>,

    /// Sender id presented to the receiver
    #[serde(default)]
    pub sender: Option<String>,

    /// Provider override (`semaphore`, `aligo`, `mock`); defaults by region
    #[serde(default)]
    pub provider: Option<String>,

    /// Ask the provider to accept but not deliver (Aligo only)
    #[serde(default)]
    pub test_mode: bool,
}

impl GatewayItemConfig {
    /// Names of required fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("code", &self.code),
            ("endpoint", &self.endpoint),
            ("apikey", &self.api_key),
            ("userid", &self.user_id),
        ];

        required
            .into_iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn sender_or_default(&self) -> &str {
        self.sender.as_deref().unwrap_or("")
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_page_delay_ms() -> u64 {
    1000
}
