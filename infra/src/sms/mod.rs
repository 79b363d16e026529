//! SMS Gateway Module
//!
//! Provider clients behind the core `SmsGateway` trait and the factory that
//! turns the `[sms]` configuration section into a `GatewayRegistry`.
//!
//! ## Providers
//!
//! - **Semaphore**: Philippine numbers, supports paged batch status queries
//! - **Aligo**: Korean numbers, single sends and lookups only
//! - **Mock**: Logs instead of sending, for development configurations

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use relay_core::domain::entities::Region;
use relay_core::services::{GatewayRegistry, SmsGateway};
use relay_shared::{GatewayConfig, GatewayItemConfig};

use crate::InfrastructureError;

pub mod aligo;
pub mod mock_sms;
pub mod semaphore;
mod wire;

pub use aligo::{AligoConfig, AligoGateway};
pub use mock_sms::MockSmsGateway;
pub use semaphore::{SemaphoreConfig, SemaphoreGateway};

#[cfg(test)]
mod tests;

/// Provider used for a region when its entry names none
pub fn default_provider(region: Region) -> &'static str {
    match region {
        Region::Ph => "semaphore",
        Region::Kr => "aligo",
    }
}

/// Build an HTTP client shared by every provider
pub fn build_http_client(timeout: Duration) -> Result<Client, InfrastructureError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Create one gateway per configured region
///
/// Entries missing a required field are logged and skipped so the rest of
/// the relay keeps running; an unknown region code or provider name is a
/// configuration error.
pub fn create_gateways(config: &GatewayConfig) -> Result<GatewayRegistry, InfrastructureError> {
    let client = build_http_client(config.request_timeout())?;
    let mut registry = GatewayRegistry::new();

    for item in &config.items {
        let missing = item.missing_fields();
        if !missing.is_empty() {
            warn!(
                code = item.code.as_deref().unwrap_or("<none>"),
                missing = ?missing,
                "Skipping incomplete SMS gateway entry"
            );
            continue;
        }

        let code = item.code.as_deref().unwrap_or_default();
        let region: Region = code.parse().map_err(InfrastructureError::Config)?;
        let gateway = create_gateway(region, item, client.clone(), config)?;

        info!(
            region = %region,
            provider = gateway.provider_name(),
            "SMS gateway registered"
        );
        registry.register(region, gateway);
    }

    if registry.is_empty() {
        warn!("No SMS gateway configured; every submitted message will fail routing");
    }

    Ok(registry)
}

fn create_gateway(
    region: Region,
    item: &GatewayItemConfig,
    client: Client,
    config: &GatewayConfig,
) -> Result<Arc<dyn SmsGateway>, InfrastructureError> {
    let provider = item
        .provider
        .as_deref()
        .map(|p| p.trim().to_ascii_lowercase())
        .unwrap_or_else(|| default_provider(region).to_string());

    match provider.as_str() {
        "semaphore" => Ok(Arc::new(SemaphoreGateway::new(
            client,
            SemaphoreConfig::from_item(item, config.page_delay()),
        ))),
        "aligo" => Ok(Arc::new(AligoGateway::new(
            client,
            AligoConfig::from_item(item),
        ))),
        "mock" => Ok(Arc::new(MockSmsGateway::new(item.sender_or_default()))),
        other => Err(InfrastructureError::Config(format!(
            "Unknown SMS provider '{}' for region {}",
            other, region
        ))),
    }
}
