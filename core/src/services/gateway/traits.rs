//! Capability trait implemented by every SMS provider client

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};

use crate::domain::entities::MessageStatus;
use crate::domain::value_objects::{DateWindow, ExternalReceipt, StatusReport};
use crate::errors::GatewayError;

/// Trait for SMS gateway integration
///
/// The sender id is bound when the client is constructed from its region's
/// configuration entry. Capabilities a provider lacks return
/// `GatewayError::Unsupported`.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Provider name used in logs and errors
    fn provider_name(&self) -> &str;

    /// Hand a message to the provider
    async fn send(&self, receiver: &str, body: &str) -> Result<ExternalReceipt, GatewayError>;

    /// Current status of one message
    async fn query_status(&self, external_id: &str) -> Result<MessageStatus, GatewayError> {
        let _ = external_id;
        Err(GatewayError::unsupported(
            self.provider_name(),
            "single status queries",
        ))
    }

    /// Status of every message the provider holds for `window`
    async fn query_status_batch(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<StatusReport>, GatewayError> {
        let _ = window;
        Err(GatewayError::unsupported(
            self.provider_name(),
            "batch status queries",
        ))
    }

    fn supports_batch(&self) -> bool {
        false
    }

    /// Offset of the calendar the provider uses for batch date filters
    fn utc_offset(&self) -> FixedOffset {
        Utc.fix()
    }
}
