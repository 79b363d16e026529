//! Application state and factory
//!
//! Builds the actix `App` used both by the binary and by the HTTP tests.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_actix_web::TracingLogger;

use relay_core::repositories::MessageRepository;
use relay_core::services::RegionRouter;

use crate::handlers::json_error_handler;
use crate::middleware::create_cors;
use crate::routes::{health_check, render_metrics, send_message};

/// State shared by every worker
pub struct AppState<R: MessageRepository> {
    pub repository: Arc<R>,
    pub router: Arc<RegionRouter>,
    /// Value the `Authorization` header must match
    pub access_key: String,
}

impl<R: MessageRepository> AppState<R> {
    pub fn new(repository: Arc<R>, router: Arc<RegionRouter>, access_key: impl Into<String>) -> Self {
        Self {
            repository,
            router,
            access_key: access_key.into(),
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<R>(
    state: web::Data<AppState<R>>,
    metrics: web::Data<PrometheusHandle>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: MessageRepository + 'static,
{
    App::new()
        .app_data(state)
        .app_data(metrics)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(create_cors())
        .wrap(TracingLogger::default())
        .route("/", web::get().to(health_check))
        .route("/send", web::post().to(send_message::<R>))
        .route("/metrics", web::get().to(render_metrics))
}
