//! Configuration for the reconciliation service

use relay_shared::config::SchedulerConfig;

/// Batch sizes for one tick
#[derive(Debug, Clone)]
pub struct ReconciliationConfig {
    /// Maximum `Started` messages sent per tick
    pub dispatch_limit: u32,
    /// Maximum in-flight messages polled per tick
    pub reconcile_limit: u32,
    /// Backlog size at which per-region batch queries replace single queries
    pub batch_threshold: usize,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            dispatch_limit: 10,
            reconcile_limit: 100,
            batch_threshold: 10,
        }
    }
}

impl From<&SchedulerConfig> for ReconciliationConfig {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            dispatch_limit: config.dispatch_limit,
            reconcile_limit: config.reconcile_limit,
            batch_threshold: config.batch_threshold,
        }
    }
}
