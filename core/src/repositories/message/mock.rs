//! Mock implementation of MessageRepository for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{Message, MessageStatus, NewMessage};
use crate::errors::StoreError;

use super::r#trait::MessageRepository;

/// Mock message repository for testing
///
/// Keeps rows in insertion order and counts writes so tests can assert on
/// how many updates a tick performed.
pub struct MockMessageRepository {
    messages: Arc<RwLock<Vec<Message>>>,
    update_calls: AtomicUsize,
    fail_list_started: AtomicBool,
    fail_list_pending: AtomicBool,
}

impl MockMessageRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            update_calls: AtomicUsize::new(0),
            fail_list_started: AtomicBool::new(false),
            fail_list_pending: AtomicBool::new(false),
        }
    }

    /// Seed a row in an arbitrary state, returning its sequence
    pub async fn seed(&self, message: NewMessage, status: MessageStatus, message_id: &str) -> i64 {
        let mut messages = self.messages.write().await;
        let sequence = messages.len() as i64 + 1;
        let mut row = message.into_message(sequence);
        row.status = status;
        row.message_id = message_id.to_string();
        messages.push(row);
        sequence
    }

    pub async fn all(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    pub async fn get(&self, sequence: i64) -> Option<Message> {
        self.messages
            .read()
            .await
            .iter()
            .find(|m| m.sequence == sequence)
            .cloned()
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_list_started(&self, fail: bool) {
        self.fail_list_started.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_list_pending(&self, fail: bool) {
        self.fail_list_pending.store(fail, Ordering::SeqCst);
    }

    async fn list_where(&self, limit: u32, keep: impl Fn(&Message) -> bool) -> Vec<Message> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|m| keep(m))
            .take(limit as usize)
            .cloned()
            .collect()
    }
}

impl Default for MockMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for MockMessageRepository {
    async fn insert(&self, message: NewMessage) -> Result<i64, StoreError> {
        let mut messages = self.messages.write().await;
        let sequence = messages.len() as i64 + 1;
        messages.push(message.into_message(sequence));
        Ok(sequence)
    }

    async fn list_started(&self, limit: u32) -> Result<Vec<Message>, StoreError> {
        if self.fail_list_started.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("mock store is down"));
        }
        Ok(self
            .list_where(limit, |m| m.status == MessageStatus::Started)
            .await)
    }

    async fn list_pending(&self, limit: u32) -> Result<Vec<Message>, StoreError> {
        if self.fail_list_pending.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("mock store is down"));
        }
        Ok(self.list_where(limit, |m| m.status.is_in_flight()).await)
    }

    async fn update_status(
        &self,
        sequence: i64,
        status: MessageStatus,
        message_id: &str,
    ) -> Result<(), StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut messages = self.messages.write().await;
        if let Some(row) = messages.iter_mut().find(|m| m.sequence == sequence) {
            row.status = status;
            row.message_id = message_id.to_string();
        }
        Ok(())
    }

    async fn requeue(
        &self,
        original: &Message,
        terminal: MessageStatus,
    ) -> Result<Option<i64>, StoreError> {
        let mut messages = self.messages.write().await;
        let Some(row) = messages
            .iter_mut()
            .find(|m| m.sequence == original.sequence && m.status.is_in_flight())
        else {
            return Ok(None);
        };
        row.status = terminal;

        let sequence = messages.len() as i64 + 1;
        messages.push(original.retry_copy().into_message(sequence));
        Ok(Some(sequence))
    }

    async fn find(&self, sequence: i64) -> Result<Option<Message>, StoreError> {
        Ok(self.get(sequence).await)
    }
}
