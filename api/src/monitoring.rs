//! Prometheus recorder for the `/metrics` endpoint
//!
//! Uses the metrics-rs facade with the Prometheus exporter. Only one
//! recorder can exist per process, so the handle is installed once and
//! shared by every app instance (actix builds one per worker).

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use relay_core::services::recording;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the recorder on first use and return its handle
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    HANDLE
        .get_or_try_init(|| {
            let handle = PrometheusBuilder::new().install_recorder()?;
            recording::describe_metrics();
            tracing::info!("prometheus metrics recorder installed");
            Ok(handle)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_is_idempotent() {
        let first = install_recorder().unwrap();
        let second = install_recorder().unwrap();

        recording::record_scrape();
        assert!(first.render().contains(recording::STATUS_GAUGE));
        assert_eq!(first.render(), second.render());
    }
}
