//! Aligo gateway client (Korea)
//!
//! Aligo takes form-encoded posts authenticated by `key` + `user_id` and
//! answers with a JSON object carrying a numeric `result_code`; anything
//! below 1 is a rejection.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use relay_core::domain::entities::MessageStatus;
use relay_core::domain::value_objects::ExternalReceipt;
use relay_core::errors::GatewayError;
use relay_core::services::SmsGateway;
use relay_shared::phone::mask_phone_number;
use relay_shared::GatewayItemConfig;

use super::wire::{read_json, transport_error, Scalar};

const PROVIDER: &str = "aligo";

/// Aligo client configuration
#[derive(Debug, Clone)]
pub struct AligoConfig {
    /// API base, e.g. `https://apis.aligo.in`
    pub endpoint: String,
    pub api_key: String,
    pub user_id: String,
    /// Registered sender number
    pub sender: String,
    /// Accept without delivering
    pub test_mode: bool,
}

impl AligoConfig {
    pub fn from_item(item: &GatewayItemConfig) -> Self {
        Self {
            endpoint: item.endpoint.clone().unwrap_or_default(),
            api_key: item.api_key.clone().unwrap_or_default(),
            user_id: item.user_id.clone().unwrap_or_default(),
            sender: item.sender_or_default().to_string(),
            test_mode: item.test_mode,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/", self.endpoint.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct SendReply {
    result_code: Scalar,
    #[serde(default)]
    message: String,
    #[serde(default)]
    msg_id: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
struct ListReply {
    result_code: Scalar,
    #[serde(default)]
    message: String,
    #[serde(default)]
    list: Vec<ListEntry>,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    #[serde(default)]
    sms_state: String,
}

fn accepted(code: &Scalar) -> bool {
    code.as_i64().map_or(false, |code| code >= 1)
}

/// Translate Aligo's Korean delivery state
pub fn delivery_state(state: &str) -> MessageStatus {
    let state = state.trim();
    if state.contains("완료") {
        MessageStatus::Sent
    } else if state.contains("실패") {
        MessageStatus::Failed
    } else {
        MessageStatus::Pending
    }
}

/// Aligo SMS gateway
pub struct AligoGateway {
    client: Client,
    config: AligoConfig,
}

impl AligoGateway {
    pub fn new(client: Client, config: AligoConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SmsGateway for AligoGateway {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    async fn send(&self, receiver: &str, body: &str) -> Result<ExternalReceipt, GatewayError> {
        let testmode = if self.config.test_mode { "Y" } else { "N" };
        let form = [
            ("key", self.config.api_key.as_str()),
            ("user_id", self.config.user_id.as_str()),
            ("sender", self.config.sender.as_str()),
            ("receiver", receiver),
            ("msg", body),
            ("testmode_yn", testmode),
        ];

        let response = self
            .client
            .post(self.config.url("send"))
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let reply: SendReply = read_json(PROVIDER, response).await?;
        if !accepted(&reply.result_code) {
            return Err(GatewayError::send_failed(
                PROVIDER,
                format!("result_code {:?}: {}", reply.result_code, reply.message),
            ));
        }

        let external_id = reply
            .msg_id
            .map(Scalar::into_text)
            .ok_or_else(|| GatewayError::invalid_response(PROVIDER, "reply has no msg_id"))?;

        debug!(
            receiver = %mask_phone_number(receiver),
            external_id = %external_id,
            test_mode = self.config.test_mode,
            "Aligo accepted message"
        );

        // Aligo does not report a queue state; acceptance counts as delivery
        Ok(ExternalReceipt::new(external_id, MessageStatus::Sent))
    }

    async fn query_status(&self, external_id: &str) -> Result<MessageStatus, GatewayError> {
        let form = [
            ("key", self.config.api_key.as_str()),
            ("user_id", self.config.user_id.as_str()),
            ("mid", external_id),
        ];

        let response = self
            .client
            .post(self.config.url("sms_list"))
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let reply: ListReply = read_json(PROVIDER, response).await?;
        if !accepted(&reply.result_code) {
            return Err(GatewayError::invalid_response(
                PROVIDER,
                format!("result_code {:?}: {}", reply.result_code, reply.message),
            ));
        }

        Ok(reply
            .list
            .first()
            .map(|entry| delivery_state(&entry.sms_state))
            .unwrap_or(MessageStatus::Pending))
    }
}
