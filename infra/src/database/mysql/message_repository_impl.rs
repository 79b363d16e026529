//! MySQL implementation of the MessageRepository trait.
//!
//! Messages live in the `sms` table; see `database::schema` for the DDL.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use relay_core::domain::entities::{Message, MessageStatus, NewMessage, UNSENT_MESSAGE_ID};
use relay_core::errors::StoreError;
use relay_core::repositories::MessageRepository;

/// MySQL implementation of MessageRepository
pub struct MySqlMessageRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlMessageRepository {
    /// Create a new MySQL message repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Message entity
    fn row_to_message(row: &MySqlRow) -> Result<Message, StoreError> {
        let region: String = row
            .try_get("region")
            .map_err(|e| StoreError::corrupt(format!("Failed to get region: {}", e)))?;
        let status: String = row
            .try_get("status")
            .map_err(|e| StoreError::corrupt(format!("Failed to get status: {}", e)))?;

        Ok(Message {
            sequence: row
                .try_get("sequence")
                .map_err(|e| StoreError::corrupt(format!("Failed to get sequence: {}", e)))?,
            receiver: row
                .try_get("receiver")
                .map_err(|e| StoreError::corrupt(format!("Failed to get receiver: {}", e)))?,
            body: row
                .try_get("message")
                .map_err(|e| StoreError::corrupt(format!("Failed to get message: {}", e)))?,
            region: region.parse().map_err(StoreError::corrupt)?,
            status: status.parse().map_err(StoreError::corrupt)?,
            message_id: row
                .try_get("message_id")
                .map_err(|e| StoreError::corrupt(format!("Failed to get message_id: {}", e)))?,
        })
    }

    async fn list_by_status(
        &self,
        query: &str,
        statuses: &[MessageStatus],
        limit: u32,
    ) -> Result<Vec<Message>, StoreError> {
        let mut statement = sqlx::query(query);
        for status in statuses {
            statement = statement.bind(status.as_str());
        }

        let rows = statement
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("list messages", e))?;

        rows.iter().map(Self::row_to_message).collect()
    }
}

/// Map a driver error onto the store's error vocabulary
fn store_error(action: &str, e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() =>
        {
            StoreError::Constraint {
                message: format!("Failed to {}: {}", action, e),
            }
        }
        _ => StoreError::unavailable(format!("Failed to {}: {}", action, e)),
    }
}

const INSERT_MESSAGE: &str = r#"
    INSERT INTO sms (receiver, message, region, status, message_id)
    VALUES (?, ?, ?, ?, ?)
"#;

#[async_trait]
impl MessageRepository for MySqlMessageRepository {
    async fn insert(&self, message: NewMessage) -> Result<i64, StoreError> {
        let result = sqlx::query(INSERT_MESSAGE)
            .bind(&message.receiver)
            .bind(&message.body)
            .bind(message.region.as_str())
            .bind(MessageStatus::Started.as_str())
            .bind(UNSENT_MESSAGE_ID)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("insert message", e))?;

        Ok(result.last_insert_id() as i64)
    }

    async fn list_started(&self, limit: u32) -> Result<Vec<Message>, StoreError> {
        let query = r#"
            SELECT sequence, receiver, message, region, status, message_id
            FROM sms
            WHERE status = ?
            ORDER BY sequence ASC
            LIMIT ?
        "#;

        self.list_by_status(query, &[MessageStatus::Started], limit)
            .await
    }

    async fn list_pending(&self, limit: u32) -> Result<Vec<Message>, StoreError> {
        let query = r#"
            SELECT sequence, receiver, message, region, status, message_id
            FROM sms
            WHERE status IN (?, ?)
            ORDER BY sequence ASC
            LIMIT ?
        "#;

        self.list_by_status(
            query,
            &[MessageStatus::Queued, MessageStatus::Pending],
            limit,
        )
        .await
    }

    async fn update_status(
        &self,
        sequence: i64,
        status: MessageStatus,
        message_id: &str,
    ) -> Result<(), StoreError> {
        let query = r#"
            UPDATE sms
            SET status = ?, message_id = ?
            WHERE sequence = ?
        "#;

        sqlx::query(query)
            .bind(status.as_str())
            .bind(message_id)
            .bind(sequence)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("update message status", e))?;

        Ok(())
    }

    async fn requeue(
        &self,
        original: &Message,
        terminal: MessageStatus,
    ) -> Result<Option<i64>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("begin requeue transaction", e))?;

        let closed = sqlx::query(
            r#"
            UPDATE sms
            SET status = ?
            WHERE sequence = ? AND status IN (?, ?)
            "#,
        )
        .bind(terminal.as_str())
        .bind(original.sequence)
        .bind(MessageStatus::Queued.as_str())
        .bind(MessageStatus::Pending.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("close out failed message", e))?;

        if closed.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| store_error("roll back requeue", e))?;
            return Ok(None);
        }

        let copy = original.retry_copy();
        let inserted = sqlx::query(INSERT_MESSAGE)
            .bind(&copy.receiver)
            .bind(&copy.body)
            .bind(copy.region.as_str())
            .bind(MessageStatus::Started.as_str())
            .bind(UNSENT_MESSAGE_ID)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("insert retry message", e))?;

        tx.commit()
            .await
            .map_err(|e| store_error("commit requeue", e))?;

        Ok(Some(inserted.last_insert_id() as i64))
    }

    async fn find(&self, sequence: i64) -> Result<Option<Message>, StoreError> {
        let query = r#"
            SELECT sequence, receiver, message, region, status, message_id
            FROM sms
            WHERE sequence = ?
        "#;

        let row = sqlx::query(query)
            .bind(sequence)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find message", e))?;

        row.as_ref().map(Self::row_to_message).transpose()
    }
}
