//! Metric names and recording helpers
//!
//! Recorded through the `metrics` facade; the binary installs the Prometheus
//! exporter that renders them on `/metrics`.

use metrics::{describe_gauge, describe_histogram};

use crate::domain::entities::Region;

/// Gauge bumped on every metrics scrape
pub const STATUS_GAUGE: &str = "status";

/// Summary observed for every accepted request and every sent message
pub const SUCCESS_SUMMARY: &str = "success";

/// Summary observed for every rejected request, failed send and failed delivery
pub const FAILURE_SUMMARY: &str = "failure";

/// Label values for the `stage` label
pub mod stage {
    pub const INTAKE: &str = "intake";
    pub const DISPATCH: &str = "dispatch";
    pub const DELIVERY: &str = "delivery";
}

/// Register descriptions for every relay metric
pub fn describe_metrics() {
    describe_gauge!(STATUS_GAUGE, "Number of metrics scrapes served");
    describe_histogram!(SUCCESS_SUMMARY, "Messages accepted for relay or reported as sent");
    describe_histogram!(
        FAILURE_SUMMARY,
        "Requests rejected at intake, sends that failed and deliveries reported failed"
    );
}

/// A `/send` request was stored
pub fn record_accepted(region: Region) {
    metrics::histogram!(
        SUCCESS_SUMMARY,
        "stage" => stage::INTAKE,
        "region" => region.as_str()
    )
    .record(1.0);
}

/// A `/send` request was turned away; `reason` is a short fixed label
pub fn record_rejected(reason: &'static str) {
    metrics::histogram!(FAILURE_SUMMARY, "stage" => stage::INTAKE, "reason" => reason).record(1.0);
}

/// A send to the region's gateway failed; the message stays started
pub fn record_dispatch_failure(region: Region) {
    metrics::histogram!(
        FAILURE_SUMMARY,
        "stage" => stage::DISPATCH,
        "region" => region.as_str()
    )
    .record(1.0);
}

pub fn record_delivery(region: Region) {
    metrics::histogram!(
        SUCCESS_SUMMARY,
        "stage" => stage::DELIVERY,
        "region" => region.as_str()
    )
    .record(1.0);
}

pub fn record_failure(region: Region) {
    metrics::histogram!(
        FAILURE_SUMMARY,
        "stage" => stage::DELIVERY,
        "region" => region.as_str()
    )
    .record(1.0);
}

pub fn record_scrape() {
    metrics::gauge!(STATUS_GAUGE).increment(1.0);
}
