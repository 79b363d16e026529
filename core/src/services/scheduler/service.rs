//! Dispatch and reconciliation of messages against their gateways

use std::collections::HashMap;
use std::sync::Arc;

use relay_shared::phone::mask_phone_number;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Message, MessageStatus, Region, UNSENT_MESSAGE_ID};
use crate::domain::value_objects::DateWindow;
use crate::errors::{DomainError, GatewayError};
use crate::repositories::MessageRepository;
use crate::services::gateway::{GatewayRegistry, SmsGateway};
use crate::services::recording;

use super::config::ReconciliationConfig;
use super::types::{DispatchReport, ReconcileReport, TickReport};

/// Moves messages through their lifecycle one tick at a time
///
/// Holds no message state between ticks; the store is the only source of
/// truth. Collaborators are fixed at construction.
pub struct ReconciliationService<R: MessageRepository + 'static> {
    repository: Arc<R>,
    gateways: GatewayRegistry,
    config: ReconciliationConfig,
}

impl<R: MessageRepository> ReconciliationService<R> {
    /// Create a new reconciliation service
    pub fn new(repository: Arc<R>, gateways: GatewayRegistry, config: ReconciliationConfig) -> Self {
        Self {
            repository,
            gateways,
            config,
        }
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Run one tick: dispatch `Started` messages, then poll in-flight ones.
    ///
    /// A failing phase is logged and recorded in the report; it never stops
    /// the other phase.
    pub async fn run_tick(&self) -> TickReport {
        let mut report = TickReport::default();

        match self.dispatch_started().await {
            Ok(dispatch) => report.dispatch = dispatch,
            Err(e) => {
                error!("Failed to dispatch started messages: {}", e);
                report.errors.push(format!("Dispatch error: {}", e));
            }
        }

        match self.reconcile_pending().await {
            Ok(reconcile) => report.reconcile = reconcile,
            Err(e) => {
                error!("Failed to reconcile pending messages: {}", e);
                report.errors.push(format!("Reconcile error: {}", e));
            }
        }

        if !report.is_idle() {
            info!(
                "Tick completed - Dispatched: {}/{}, Polled: {}, Delivered: {}, Requeued: {}",
                report.dispatch.dispatched,
                report.dispatch.attempted,
                report.reconcile.polled,
                report.reconcile.delivered,
                report.reconcile.requeued
            );
        }

        report
    }

    /// Send every `Started` message (up to the dispatch limit) to its gateway.
    ///
    /// A message whose send fails stays `Started` with id `"0"` and is picked
    /// up again next tick.
    pub async fn dispatch_started(&self) -> Result<DispatchReport, DomainError> {
        let started = self
            .repository
            .list_started(self.config.dispatch_limit)
            .await?;

        let mut report = DispatchReport {
            attempted: started.len(),
            ..Default::default()
        };

        for message in &started {
            match self.dispatch_one(message).await {
                Ok(status) => {
                    report.dispatched += 1;
                    if status == MessageStatus::Sent {
                        recording::record_delivery(message.region);
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    recording::record_dispatch_failure(message.region);
                    warn!(
                        sequence = message.sequence,
                        region = %message.region,
                        receiver = %mask_phone_number(&message.receiver),
                        error = %e,
                        "Dispatch failed, message stays started"
                    );
                }
            }
        }

        Ok(report)
    }

    async fn dispatch_one(&self, message: &Message) -> Result<MessageStatus, DomainError> {
        let gateway = self.gateways.get(message.region)?;
        let receipt = gateway.send(&message.receiver, &message.body).await?;

        let external_id = receipt.external_id.trim();
        if external_id.is_empty() || external_id == UNSENT_MESSAGE_ID {
            return Err(GatewayError::invalid_response(
                gateway.provider_name(),
                "receipt carries no message id",
            )
            .into());
        }

        let status = status_after_send(receipt.status);
        self.repository
            .update_status(message.sequence, status, external_id)
            .await?;

        debug!(
            sequence = message.sequence,
            external_id,
            status = %status,
            provider = gateway.provider_name(),
            "Message handed to gateway"
        );
        Ok(status)
    }

    /// Poll the gateway for every in-flight message (up to the reconcile limit).
    ///
    /// Below the batch threshold each message is queried on its own; from the
    /// threshold on, one batch query is issued per region present.
    pub async fn reconcile_pending(&self) -> Result<ReconcileReport, DomainError> {
        let backlog = self
            .repository
            .list_pending(self.config.reconcile_limit)
            .await?;

        let mut report = ReconcileReport {
            polled: backlog.len(),
            ..Default::default()
        };

        if backlog.is_empty() {
            return Ok(report);
        }

        if backlog.len() < self.config.batch_threshold {
            for message in &backlog {
                self.reconcile_single(message, &mut report).await;
            }
            return Ok(report);
        }

        let mut by_region: HashMap<Region, Vec<&Message>> = HashMap::new();
        for message in &backlog {
            by_region.entry(message.region).or_default().push(message);
        }

        for (region, messages) in by_region {
            self.reconcile_region(region, &messages, &mut report).await;
        }

        Ok(report)
    }

    async fn reconcile_single(&self, message: &Message, report: &mut ReconcileReport) {
        let gateway = match self.gateways.get(message.region) {
            Ok(gateway) => gateway,
            Err(e) => {
                report.failed += 1;
                warn!(sequence = message.sequence, error = %e, "Cannot poll message");
                return;
            }
        };

        report.single_queries += 1;
        match gateway.query_status(&message.message_id).await {
            Ok(status) => self.apply_status(message, status, report).await,
            Err(e) => {
                // Unknown outcome; leave the row as it is and ask again next tick
                report.failed += 1;
                warn!(
                    sequence = message.sequence,
                    external_id = %message.message_id,
                    error = %e,
                    "Status query failed"
                );
            }
        }
    }

    async fn reconcile_region(
        &self,
        region: Region,
        messages: &[&Message],
        report: &mut ReconcileReport,
    ) {
        let gateway = match self.gateways.get(region) {
            Ok(gateway) => gateway,
            Err(e) => {
                report.failed += messages.len();
                warn!(region = %region, error = %e, "Cannot poll region");
                return;
            }
        };

        if !gateway.supports_batch() {
            for message in messages {
                self.reconcile_single(message, report).await;
            }
            return;
        }

        report.batch_queries += 1;
        let statuses = match self.query_batch(gateway.as_ref()).await {
            Ok(statuses) => statuses,
            Err(e) if e.is_unsupported() => {
                for message in messages {
                    self.reconcile_single(message, report).await;
                }
                return;
            }
            Err(e) => {
                report.failed += messages.len();
                warn!(region = %region, error = %e, "Batch status query failed");
                return;
            }
        };

        for message in messages {
            match statuses.get(message.message_id.as_str()) {
                Some(status) => self.apply_status(message, *status, report).await,
                None => report.unmatched += 1,
            }
        }
    }

    async fn query_batch(
        &self,
        gateway: &dyn SmsGateway,
    ) -> Result<HashMap<String, MessageStatus>, GatewayError> {
        let window = DateWindow::covering_today(gateway.utc_offset());
        let reports = gateway.query_status_batch(&window).await?;

        Ok(reports
            .into_iter()
            .map(|report| (report.external_id, report.status))
            .collect())
    }

    /// Write a polled status, re-queuing failed deliveries
    async fn apply_status(
        &self,
        message: &Message,
        status: MessageStatus,
        report: &mut ReconcileReport,
    ) {
        if status.needs_retry() {
            recording::record_failure(message.region);
            match self.repository.requeue(message, status).await {
                Ok(Some(sequence)) => {
                    report.requeued += 1;
                    info!(
                        sequence = message.sequence,
                        retry_sequence = sequence,
                        status = %status,
                        receiver = %mask_phone_number(&message.receiver),
                        "Delivery failed, message requeued"
                    );
                }
                Ok(None) => {
                    report.unchanged += 1;
                    debug!(sequence = message.sequence, "Message was already requeued");
                }
                Err(e) => {
                    report.failed += 1;
                    error!(sequence = message.sequence, error = %e, "Failed to requeue message");
                }
            }
            return;
        }

        if status == message.status {
            report.unchanged += 1;
            return;
        }

        if !message.status.can_transition_to(status) {
            report.failed += 1;
            warn!(
                sequence = message.sequence,
                from = %message.status,
                to = %status,
                "Ignoring status outside the message lifecycle"
            );
            return;
        }

        match self
            .repository
            .update_status(message.sequence, status, &message.message_id)
            .await
        {
            Ok(()) => {
                report.updated += 1;
                if status == MessageStatus::Sent {
                    report.delivered += 1;
                    recording::record_delivery(message.region);
                }
            }
            Err(e) => {
                report.failed += 1;
                error!(sequence = message.sequence, error = %e, "Failed to update message status");
            }
        }
    }
}

/// Status recorded right after a successful send.
///
/// Only `Queued`, `Pending` or `Sent` may follow `Started`; anything else is
/// recorded as `Pending` and settled by the next poll.
pub(crate) fn status_after_send(reported: MessageStatus) -> MessageStatus {
    match reported {
        MessageStatus::Queued | MessageStatus::Pending | MessageStatus::Sent => reported,
        _ => MessageStatus::Pending,
    }
}
