//! Reconciliation scheduler for outbound messages
//!
//! This module drives the message lifecycle:
//! - Dispatch of `Started` messages to their region's gateway
//! - Status polling of in-flight messages, single or batched by backlog size
//! - Re-queuing of failed and refunded deliveries as fresh messages
//! - A cron-driven, non-overlapping runner with graceful shutdown

mod config;
mod runner;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::ReconciliationConfig;
pub use runner::SchedulerRunner;
pub use service::ReconciliationService;
pub use types::{DispatchReport, ReconcileReport, TickReport};
