//! Tests for the in-memory message store

use relay_core::domain::entities::{MessageStatus, NewMessage, Region, UNSENT_MESSAGE_ID};
use relay_core::errors::StoreError;
use relay_core::repositories::MessageRepository;

use crate::database::InMemoryMessageRepository;

fn message(n: usize) -> NewMessage {
    NewMessage::new(format!("0917123{:04}", n), format!("body {}", n), Region::Ph)
}

#[tokio::test]
async fn test_insert_assigns_increasing_sequences() {
    let repo = InMemoryMessageRepository::new();

    let first = repo.insert(message(1)).await.unwrap();
    let second = repo.insert(message(2)).await.unwrap();
    assert!(second > first);

    let stored = repo.find(first).await.unwrap().unwrap();
    assert_eq!(stored.status, MessageStatus::Started);
    assert_eq!(stored.message_id, UNSENT_MESSAGE_ID);
    assert_eq!(stored.receiver, "09171230001");
}

#[tokio::test]
async fn test_list_started_is_fifo_and_limited() {
    let repo = InMemoryMessageRepository::new();
    for n in 0..5 {
        repo.insert(message(n)).await.unwrap();
    }
    repo.update_status(1, MessageStatus::Pending, "ext-1")
        .await
        .unwrap();

    let started = repo.list_started(3).await.unwrap();
    let sequences: Vec<_> = started.iter().map(|m| m.sequence).collect();
    assert_eq!(sequences, vec![2, 3, 4]);
}

#[tokio::test]
async fn test_list_pending_covers_queued_and_pending_only() {
    let repo = InMemoryMessageRepository::new();
    for n in 0..4 {
        repo.insert(message(n)).await.unwrap();
    }
    repo.update_status(1, MessageStatus::Queued, "a").await.unwrap();
    repo.update_status(2, MessageStatus::Pending, "b").await.unwrap();
    repo.update_status(3, MessageStatus::Sent, "c").await.unwrap();

    let pending = repo.list_pending(10).await.unwrap();
    let ids: Vec<_> = pending.iter().map(|m| m.message_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let repo = InMemoryMessageRepository::new();
    let sequence = repo.insert(message(1)).await.unwrap();

    repo.update_status(sequence, MessageStatus::Sent, "ext-9")
        .await
        .unwrap();
    let once = repo.snapshot().await;
    repo.update_status(sequence, MessageStatus::Sent, "ext-9")
        .await
        .unwrap();

    assert_eq!(repo.snapshot().await, once);
}

#[tokio::test]
async fn test_requeue_creates_exactly_one_copy() {
    let repo = InMemoryMessageRepository::new();
    let sequence = repo.insert(message(1)).await.unwrap();
    repo.update_status(sequence, MessageStatus::Pending, "ext-1")
        .await
        .unwrap();
    let original = repo.find(sequence).await.unwrap().unwrap();

    let copy = repo
        .requeue(&original, MessageStatus::Failed)
        .await
        .unwrap()
        .expect("first requeue inserts a copy");
    assert!(repo
        .requeue(&original, MessageStatus::Failed)
        .await
        .unwrap()
        .is_none());

    let rows = repo.snapshot().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, MessageStatus::Failed);
    assert_eq!(rows[0].message_id, "ext-1");

    let copy = repo.find(copy).await.unwrap().unwrap();
    assert_eq!(copy.status, MessageStatus::Started);
    assert_eq!(copy.message_id, UNSENT_MESSAGE_ID);
    assert_eq!(copy.receiver, original.receiver);
    assert_eq!(copy.body, original.body);
    assert_eq!(copy.region, original.region);
}

#[tokio::test]
async fn test_requeue_ignores_terminal_rows() {
    let repo = InMemoryMessageRepository::new();
    let sequence = repo.insert(message(1)).await.unwrap();
    repo.update_status(sequence, MessageStatus::Sent, "ext-1")
        .await
        .unwrap();
    let sent = repo.find(sequence).await.unwrap().unwrap();

    assert!(repo
        .requeue(&sent, MessageStatus::Refunded)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        repo.find(sequence).await.unwrap().unwrap().status,
        MessageStatus::Sent
    );
}

#[tokio::test]
async fn test_offline_store_reports_unavailable() {
    let repo = InMemoryMessageRepository::new();
    repo.set_available(false);

    assert!(matches!(
        repo.insert(message(1)).await,
        Err(StoreError::Unavailable { .. })
    ));
    assert!(repo.list_started(1).await.is_err());

    repo.set_available(true);
    assert!(repo.insert(message(1)).await.is_ok());
}
