//! Mock SMS gateway for development and tests
//!
//! Logs messages instead of sending them and reports them delivered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use relay_core::domain::entities::MessageStatus;
use relay_core::domain::value_objects::ExternalReceipt;
use relay_core::errors::GatewayError;
use relay_core::services::SmsGateway;
use relay_shared::phone::mask_phone_number;

const PROVIDER: &str = "mock";

#[derive(Debug, Clone, Default)]
pub struct MockSmsGateway {
    sender: String,
    /// Shared so clones handed to the registry report the same count
    message_count: Arc<AtomicU64>,
    simulate_failure: bool,
}

impl MockSmsGateway {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            ..Default::default()
        }
    }

    /// A mock whose sends are always rejected
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Default::default()
        }
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsGateway for MockSmsGateway {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    async fn send(&self, receiver: &str, body: &str) -> Result<ExternalReceipt, GatewayError> {
        if self.simulate_failure {
            return Err(GatewayError::send_failed(PROVIDER, "simulated failure"));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            sender = %self.sender,
            receiver = %mask_phone_number(receiver),
            length = body.chars().count(),
            message_id = %message_id,
            "Mock SMS sent"
        );

        Ok(ExternalReceipt::new(message_id, MessageStatus::Sent))
    }

    async fn query_status(&self, _external_id: &str) -> Result<MessageStatus, GatewayError> {
        Ok(MessageStatus::Sent)
    }
}
