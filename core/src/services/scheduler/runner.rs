//! Cron-driven loop around the reconciliation service

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use croner::Cron;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::errors::DomainError;
use crate::repositories::MessageRepository;

use super::service::ReconciliationService;

/// Runs ticks on a cron schedule, one at a time
///
/// The next fire time is computed only after the previous tick returns, so
/// ticks never overlap. Cancellation is observed between ticks; a tick that
/// has started always runs to completion.
pub struct SchedulerRunner<R: MessageRepository + 'static> {
    name: String,
    schedule: Cron,
    service: Arc<ReconciliationService<R>>,
}

impl<R: MessageRepository> SchedulerRunner<R> {
    /// Create a runner for `expression` (seconds field optional)
    pub fn new(
        name: impl Into<String>,
        expression: &str,
        service: Arc<ReconciliationService<R>>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let schedule = Cron::new(expression)
            .with_seconds_optional()
            .parse()
            .map_err(|e| DomainError::Validation {
                message: format!("invalid cron expression for job '{}': {}", name, e),
            })?;

        Ok(Self {
            name,
            schedule,
            service,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time to wait from `now` until the next fire time
    pub fn next_delay(&self, now: DateTime<Local>) -> Result<Duration, DomainError> {
        let next = self
            .schedule
            .find_next_occurrence(&now, false)
            .map_err(|e| DomainError::Internal {
                message: format!("no next occurrence for job '{}': {}", self.name, e),
            })?;

        Ok((next - now).to_std().unwrap_or(Duration::ZERO))
    }

    /// Run until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        info!(job = %self.name, "Scheduler started");

        loop {
            let delay = match self.next_delay(Local::now()) {
                Ok(delay) => delay,
                Err(e) => {
                    error!(job = %self.name, error = %e, "Scheduler stopped");
                    break;
                }
            };

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }

            let report = self.service.run_tick().await;
            debug!(job = %self.name, ?report, "Tick finished");
        }

        info!(job = %self.name, "Scheduler stopped");
    }

    /// Spawn the loop on the current runtime
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
