//! Semaphore gateway client (Philippines)
//!
//! Semaphore answers every call with a JSON array of message records.
//! Sends are JSON posts; status lookups are plain GETs keyed by the api key.
//! The batch listing is paged and filtered by calendar day in Manila time.

use std::time::Duration;

use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use relay_core::domain::entities::MessageStatus;
use relay_core::domain::value_objects::{DateWindow, ExternalReceipt, StatusReport};
use relay_core::errors::GatewayError;
use relay_core::services::SmsGateway;
use relay_shared::phone::mask_phone_number;
use relay_shared::GatewayItemConfig;

use super::wire::{read_json, transport_error, Scalar};

const PROVIDER: &str = "semaphore";

/// Records requested per page of the batch listing
pub const PAGE_SIZE: u32 = 1000;

/// Manila is UTC+8 all year
const MANILA_OFFSET: FixedOffset = match FixedOffset::east_opt(8 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC+8 is a valid offset"),
};

/// Semaphore client configuration
#[derive(Debug, Clone)]
pub struct SemaphoreConfig {
    /// Messages endpoint, e.g. `https://api.semaphore.co/api/v4/messages`
    pub endpoint: String,
    pub api_key: String,
    /// Sender name shown on the handset; empty uses the account default
    pub sender_name: String,
    /// Pause between batch pages
    pub page_delay: Duration,
}

impl SemaphoreConfig {
    pub fn from_item(item: &GatewayItemConfig, page_delay: Duration) -> Self {
        Self {
            endpoint: item.endpoint.clone().unwrap_or_default(),
            api_key: item.api_key.clone().unwrap_or_default(),
            sender_name: item.sender_or_default().to_string(),
            page_delay,
        }
    }

    fn base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    apikey: &'a str,
    number: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    sendername: &'a str,
}

/// One message record as Semaphore reports it
#[derive(Debug, Deserialize)]
struct SemaphoreMessage {
    message_id: Scalar,
    #[serde(default)]
    status: Option<String>,
}

impl SemaphoreMessage {
    fn status(&self) -> MessageStatus {
        MessageStatus::from_gateway(self.status.as_deref().unwrap_or_default())
    }

    fn into_report(self) -> StatusReport {
        let status = self.status();
        StatusReport::new(self.message_id.into_text(), status)
    }
}

/// Semaphore SMS gateway
pub struct SemaphoreGateway {
    client: Client,
    config: SemaphoreConfig,
}

impl SemaphoreGateway {
    pub fn new(client: Client, config: SemaphoreConfig) -> Self {
        Self { client, config }
    }

    async fn fetch_page(
        &self,
        window: &DateWindow,
        page: u32,
    ) -> Result<Vec<SemaphoreMessage>, GatewayError> {
        let response = self
            .client
            .get(self.config.base())
            .query(&[
                ("apikey", self.config.api_key.clone()),
                ("page", page.to_string()),
                ("limit", PAGE_SIZE.to_string()),
                ("startDate", window.start_param()),
                ("endDate", window.end_param()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        read_json(PROVIDER, response).await
    }
}

#[async_trait]
impl SmsGateway for SemaphoreGateway {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    async fn send(&self, receiver: &str, body: &str) -> Result<ExternalReceipt, GatewayError> {
        let request = SendRequest {
            apikey: &self.config.api_key,
            number: receiver,
            message: body,
            sendername: &self.config.sender_name,
        };

        let response = self
            .client
            .post(self.config.base())
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let messages: Vec<SemaphoreMessage> = read_json(PROVIDER, response).await?;
        let first = messages
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::invalid_response(PROVIDER, "empty send reply"))?;

        let status = first.status();
        let external_id = first.message_id.into_text();
        debug!(
            receiver = %mask_phone_number(receiver),
            external_id = %external_id,
            status = %status,
            "Semaphore accepted message"
        );

        Ok(ExternalReceipt::new(external_id, status))
    }

    async fn query_status(&self, external_id: &str) -> Result<MessageStatus, GatewayError> {
        let response = self
            .client
            .get(format!("{}/{}", self.config.base(), external_id))
            .query(&[("apikey", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let messages: Vec<SemaphoreMessage> = read_json(PROVIDER, response).await?;

        // Semaphore forgets messages it never delivered
        Ok(messages
            .first()
            .map(SemaphoreMessage::status)
            .unwrap_or(MessageStatus::Failed))
    }

    async fn query_status_batch(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<StatusReport>, GatewayError> {
        let mut reports = Vec::new();
        let mut page = 1;

        loop {
            let records = match self.fetch_page(window, page).await {
                Ok(records) => records,
                Err(e) => {
                    warn!(page, error = %e, "Semaphore page fetch failed, keeping earlier pages");
                    break;
                }
            };

            if records.is_empty() {
                break;
            }

            reports.extend(records.into_iter().map(SemaphoreMessage::into_report));
            page += 1;
            tokio::time::sleep(self.config.page_delay).await;
        }

        debug!(
            pages = page,
            reports = reports.len(),
            start = %window.start_param(),
            end = %window.end_param(),
            "Semaphore batch query finished"
        );

        Ok(reports)
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn utc_offset(&self) -> FixedOffset {
        MANILA_OFFSET
    }
}
