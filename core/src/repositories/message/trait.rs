//! Message repository trait defining the durable message store.

use async_trait::async_trait;

use crate::domain::entities::{Message, MessageStatus, NewMessage};
use crate::errors::StoreError;

/// Repository trait for message persistence
///
/// Every operation is a single transaction against the backing table.
/// Failures surface as `StoreError` and never drop a message silently.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message as `Started` with message id `"0"`
    ///
    /// # Returns
    /// * `Ok(i64)` - The store-assigned sequence
    async fn insert(&self, message: NewMessage) -> Result<i64, StoreError>;

    /// Up to `limit` `Started` messages, oldest sequence first
    async fn list_started(&self, limit: u32) -> Result<Vec<Message>, StoreError>;

    /// Up to `limit` `Queued` or `Pending` messages, oldest sequence first
    async fn list_pending(&self, limit: u32) -> Result<Vec<Message>, StoreError>;

    /// Overwrite status and gateway id; repeating the same write is a no-op
    async fn update_status(
        &self,
        sequence: i64,
        status: MessageStatus,
        message_id: &str,
    ) -> Result<(), StoreError>;

    /// Close out a failed delivery and insert its fresh `Started` copy.
    ///
    /// Both writes happen in one transaction. The original row is only
    /// closed if it is still `Queued`/`Pending`; otherwise nothing is written
    /// and `Ok(None)` is returned, so concurrent callers produce exactly one
    /// copy.
    ///
    /// # Returns
    /// * `Ok(Some(i64))` - Sequence of the new message
    /// * `Ok(None)` - The original had already been closed out
    async fn requeue(
        &self,
        original: &Message,
        terminal: MessageStatus,
    ) -> Result<Option<i64>, StoreError>;

    /// Point lookup by sequence
    async fn find(&self, sequence: i64) -> Result<Option<Message>, StoreError>;
}
