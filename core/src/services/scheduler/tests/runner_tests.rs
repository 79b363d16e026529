//! Tests for the cron-driven scheduler runner

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeZone};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use super::mocks::MockGateway;
use crate::domain::entities::{MessageStatus, NewMessage, Region};
use crate::errors::DomainError;
use crate::repositories::{MessageRepository, MockMessageRepository};
use crate::services::gateway::GatewayRegistry;
use crate::services::scheduler::{ReconciliationConfig, ReconciliationService, SchedulerRunner};

fn service(
    repo: Arc<MockMessageRepository>,
    registry: GatewayRegistry,
) -> Arc<ReconciliationService<MockMessageRepository>> {
    Arc::new(ReconciliationService::new(
        repo,
        registry,
        ReconciliationConfig::default(),
    ))
}

#[test]
fn test_invalid_expression_is_rejected() {
    let repo = Arc::new(MockMessageRepository::new());
    let result = SchedulerRunner::new("sms", "every second please", service(repo, GatewayRegistry::new()));

    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[test]
fn test_next_delay_for_every_second() {
    let repo = Arc::new(MockMessageRepository::new());
    let runner = SchedulerRunner::new("sms", "*/1 * * * * *", service(repo, GatewayRegistry::new()))
        .unwrap();

    let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let delay = runner.next_delay(now).unwrap();
    assert_eq!(delay, Duration::from_secs(1));
    assert_eq!(runner.name(), "sms");
}

#[test]
fn test_five_field_expression_fires_on_minute() {
    let repo = Arc::new(MockMessageRepository::new());
    let runner = SchedulerRunner::new("sms", "*/5 * * * *", service(repo, GatewayRegistry::new()))
        .unwrap();

    let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 1, 30).unwrap();
    let delay = runner.next_delay(now).unwrap();
    assert_eq!(delay, Duration::from_secs(210));
}

#[tokio::test]
async fn test_runner_ticks_until_cancelled() {
    let repo = Arc::new(MockMessageRepository::new());
    let kr = Arc::new(MockGateway::new(MessageStatus::Sent));
    let registry = GatewayRegistry::new().with(Region::Kr, kr.clone());

    let sequence = repo
        .insert(NewMessage::new("01010002000", "hello", Region::Kr))
        .await
        .unwrap();

    let shutdown = CancellationToken::new();
    let handle = SchedulerRunner::new("sms", "*/1 * * * * *", service(repo.clone(), registry))
        .unwrap()
        .spawn(shutdown.clone());

    tokio::time::sleep(Duration::from_millis(2200)).await;
    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("runner should stop after cancellation")
        .unwrap();

    assert_eq!(kr.send_calls(), 1);
    assert_eq!(
        repo.get(sequence).await.unwrap().status,
        MessageStatus::Sent
    );
}

#[tokio::test]
async fn test_cancel_before_first_tick_stops_promptly() {
    let repo = Arc::new(MockMessageRepository::new());
    let shutdown = CancellationToken::new();
    let handle = SchedulerRunner::new(
        "sms",
        "0 0 0 1 1 *",
        service(repo.clone(), GatewayRegistry::new()),
    )
    .unwrap()
    .spawn(shutdown.clone());

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("runner should stop without waiting for the schedule")
        .unwrap();
}

#[tokio::test]
async fn test_cancel_during_tick_lets_tick_finish() {
    let repo = Arc::new(MockMessageRepository::new());
    let release = Arc::new(Notify::new());
    let kr = Arc::new(MockGateway::new(MessageStatus::Sent).gated(release.clone()));
    let registry = GatewayRegistry::new().with(Region::Kr, kr.clone());

    let sequence = repo
        .insert(NewMessage::new("01010002000", "hello", Region::Kr))
        .await
        .unwrap();

    let shutdown = CancellationToken::new();
    let handle = SchedulerRunner::new("sms", "*/1 * * * * *", service(repo.clone(), registry))
        .unwrap()
        .spawn(shutdown.clone());

    tokio::time::timeout(Duration::from_secs(5), kr.entered.notified())
        .await
        .expect("first tick should reach the gateway");

    // Shutdown arrives while the send is still outstanding
    shutdown.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_finished());
    assert_eq!(
        repo.get(sequence).await.unwrap().status,
        MessageStatus::Started
    );

    release.notify_one();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("runner should stop once the tick completes")
        .unwrap();

    assert_eq!(kr.send_calls(), 1);
    let message = repo.get(sequence).await.unwrap();
    assert_eq!(message.status, MessageStatus::Sent);
    assert_eq!(message.message_id, "ext-1");
}
