//! Per-tick summaries returned by the reconciliation service

/// Outcome of sending `Started` messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Messages picked up from the store
    pub attempted: usize,
    /// Messages accepted by a gateway and written back
    pub dispatched: usize,
    /// Messages left `Started` for the next tick
    pub failed: usize,
}

/// Outcome of polling in-flight messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Messages picked up from the store
    pub polled: usize,
    pub single_queries: usize,
    pub batch_queries: usize,
    /// Status writes other than re-queues
    pub updated: usize,
    /// Messages that reached `Sent`
    pub delivered: usize,
    /// Failed or refunded messages copied back to `Started`
    pub requeued: usize,
    /// Messages whose status did not change
    pub unchanged: usize,
    /// Messages missing from a batch answer
    pub unmatched: usize,
    /// Messages skipped because of a gateway or store error
    pub failed: usize,
}

/// Summary of a whole tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub dispatch: DispatchReport,
    pub reconcile: ReconcileReport,
    /// Phase level errors; per-message errors are only counted
    pub errors: Vec<String>,
}

impl TickReport {
    /// Nothing was picked up in either phase
    pub fn is_idle(&self) -> bool {
        self.dispatch.attempted == 0 && self.reconcile.polled == 0 && self.errors.is_empty()
    }
}
