//! In-memory implementation of the MessageRepository trait.
//!
//! Same semantics as the MySQL store; used for local development and for
//! exercising the HTTP surface and the scheduler without a database.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use relay_core::domain::entities::{Message, MessageStatus, NewMessage};
use relay_core::errors::StoreError;
use relay_core::repositories::MessageRepository;

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Message>,
    last_sequence: i64,
}

impl Table {
    fn insert(&mut self, message: NewMessage) -> i64 {
        self.last_sequence += 1;
        let sequence = self.last_sequence;
        self.rows.insert(sequence, message.into_message(sequence));
        sequence
    }
}

/// Message store held in process memory
pub struct InMemoryMessageRepository {
    table: RwLock<Table>,
    available: AtomicBool,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: every operation fails with `Unavailable` while unset
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Snapshot of every row, ordered by sequence
    pub async fn snapshot(&self) -> Vec<Message> {
        self.table.read().await.rows.values().cloned().collect()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable("in-memory store is offline"))
        }
    }

    async fn list_where(
        &self,
        limit: u32,
        keep: impl Fn(MessageStatus) -> bool,
    ) -> Result<Vec<Message>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|m| keep(m.status))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: NewMessage) -> Result<i64, StoreError> {
        self.ensure_available()?;
        Ok(self.table.write().await.insert(message))
    }

    async fn list_started(&self, limit: u32) -> Result<Vec<Message>, StoreError> {
        self.list_where(limit, |status| status == MessageStatus::Started)
            .await
    }

    async fn list_pending(&self, limit: u32) -> Result<Vec<Message>, StoreError> {
        self.list_where(limit, |status| status.is_in_flight()).await
    }

    async fn update_status(
        &self,
        sequence: i64,
        status: MessageStatus,
        message_id: &str,
    ) -> Result<(), StoreError> {
        self.ensure_available()?;
        if let Some(row) = self.table.write().await.rows.get_mut(&sequence) {
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
        self.ensure_available()?;
        let mut table = self.table.write().await;

        match table.rows.get_mut(&original.sequence) {
            Some(row) if row.status.is_in_flight() => row.status = terminal,
            _ => return Ok(None),
        }

        Ok(Some(table.insert(original.retry_copy())))
    }

    async fn find(&self, sequence: i64) -> Result<Option<Message>, StoreError> {
        self.ensure_available()?;
        Ok(self.table.read().await.rows.get(&sequence).cloned())
    }
}
