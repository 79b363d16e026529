use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use relay_api::monitoring::install_recorder;
use relay_api::telemetry::init_tracing;
use relay_api::{create_app, AppState};
use relay_core::services::{
    ReconciliationConfig, ReconciliationService, RegionRouter, SchedulerRunner,
};
use relay_infra::database::{DatabasePool, MySqlMessageRepository};
use relay_infra::sms::create_gateways;
use relay_shared::config::SMS_JOB_NAME;
use relay_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!("Starting SMS relay");

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to the message store")?;
    pool.create_tables()
        .await
        .context("failed to create the sms table")?;
    let repository = Arc::new(MySqlMessageRepository::new(pool.get_pool().clone()));

    let gateways = create_gateways(&config.sms).context("failed to build SMS gateways")?;
    let router = Arc::new(RegionRouter::from_registry(&gateways));
    let metrics = install_recorder().context("failed to install metrics recorder")?;

    let shutdown = CancellationToken::new();
    let runner = match config.scheduler.enabled_job(SMS_JOB_NAME) {
        Some(job) if config.scheduler.enable => {
            let service = Arc::new(ReconciliationService::new(
                repository.clone(),
                gateways.clone(),
                ReconciliationConfig::from(&config.scheduler),
            ));
            let runner = SchedulerRunner::new(job.name.clone(), &job.expression, service)?;
            info!(job = %job.name, expression = %job.expression, "Scheduler enabled");
            Some(runner.spawn(shutdown.clone()))
        }
        _ => {
            info!("Scheduler disabled");
            None
        }
    };

    let state = web::Data::new(AppState::new(
        repository,
        router,
        config.setting.access_key.clone(),
    ));
    let metrics = web::Data::new(metrics);

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone(), metrics.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    let served = server.bind(&bind_address)?.run().await;

    // Let the in-flight tick finish before the pool goes away
    shutdown.cancel();
    if let Some(handle) = runner {
        if let Err(e) = handle.await {
            warn!(error = %e, "Scheduler task ended abnormally");
        }
    }
    pool.close().await;

    info!("SMS relay stopped");
    served.map_err(Into::into)
}
