use actix_web::{web, HttpResponse};
use metrics_exporter_prometheus::PrometheusHandle;

use relay_core::services::recording;

/// Handler for GET /metrics
///
/// Bumps the scrape gauge, then renders every metric in Prometheus text
/// format.
pub async fn render_metrics(handle: web::Data<PrometheusHandle>) -> HttpResponse {
    recording::record_scrape();

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(handle.render())
}
