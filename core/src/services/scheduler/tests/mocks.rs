//! Mock gateway for testing the reconciliation service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::entities::MessageStatus;
use crate::domain::value_objects::{DateWindow, ExternalReceipt, StatusReport};
use crate::errors::GatewayError;
use crate::services::gateway::SmsGateway;

// Mock gateway that counts every call
pub struct MockGateway {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub statuses: Arc<Mutex<HashMap<String, MessageStatus>>>,
    pub send_status: MessageStatus,
    pub should_fail: bool,
    pub batch_enabled: bool,
    pub batch_should_fail: bool,
    /// Signalled when a send starts
    pub entered: Arc<Notify>,
    /// When set, a send waits for this before replying
    release: Option<Arc<Notify>>,
    send_calls: AtomicUsize,
    query_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl MockGateway {
    pub fn new(send_status: MessageStatus) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            statuses: Arc::new(Mutex::new(HashMap::new())),
            send_status,
            should_fail: false,
            batch_enabled: true,
            batch_should_fail: false,
            entered: Arc::new(Notify::new()),
            release: None,
            send_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new(MessageStatus::Pending)
        }
    }

    pub fn without_batch(mut self) -> Self {
        self.batch_enabled = false;
        self
    }

    /// Hold every send until `release` is notified
    pub fn gated(mut self, release: Arc<Notify>) -> Self {
        self.release = Some(release);
        self
    }

    pub fn set_status(&self, external_id: &str, status: MessageStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(external_id.to_string(), status);
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsGateway for MockGateway {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn send(&self, receiver: &str, body: &str) -> Result<ExternalReceipt, GatewayError> {
        let call = self.send_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.entered.notify_one();
        if let Some(release) = &self.release {
            release.notified().await;
        }
        if self.should_fail {
            return Err(GatewayError::send_failed("mock", "gateway unavailable"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((receiver.to_string(), body.to_string()));
        Ok(ExternalReceipt::new(format!("ext-{}", call), self.send_status))
    }

    async fn query_status(&self, external_id: &str) -> Result<MessageStatus, GatewayError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(GatewayError::Timeout {
                provider: "mock".to_string(),
            });
        }
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(external_id)
            .copied()
            .unwrap_or(MessageStatus::Pending))
    }

    async fn query_status_batch(
        &self,
        _window: &DateWindow,
    ) -> Result<Vec<StatusReport>, GatewayError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.batch_should_fail {
            return Err(GatewayError::Timeout {
                provider: "mock".to_string(),
            });
        }
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .iter()
            .map(|(id, status)| StatusReport::new(id.clone(), *status))
            .collect())
    }

    fn supports_batch(&self) -> bool {
        self.batch_enabled
    }
}
