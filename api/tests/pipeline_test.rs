//! Intake through dispatch: a message accepted over HTTP leaves `started`
//! after one scheduler tick.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{test, web};
use serde_json::{json, Value};

use relay_api::monitoring::install_recorder;
use relay_api::{create_app, AppState};
use relay_core::domain::entities::{MessageStatus, Region, UNSENT_MESSAGE_ID};
use relay_core::services::{
    GatewayRegistry, ReconciliationConfig, ReconciliationService, RegionRouter,
};
use relay_infra::database::InMemoryMessageRepository;
use relay_infra::sms::MockSmsGateway;

const ACCESS_KEY: &str = "pipeline-key";

#[actix_web::test]
async fn test_accepted_message_is_dispatched_by_next_tick() {
    let repo = Arc::new(InMemoryMessageRepository::new());
    let gateway = Arc::new(MockSmsGateway::new("RELAY"));
    let registry = GatewayRegistry::new().with(Region::Kr, gateway.clone());
    let router = Arc::new(RegionRouter::from_registry(&registry));

    let state = web::Data::new(AppState::new(repo.clone(), router, ACCESS_KEY));
    let metrics = web::Data::new(install_recorder().unwrap());
    let app = test::init_service(create_app(state, metrics)).await;

    let req = test::TestRequest::post()
        .uri("/send")
        .insert_header((header::AUTHORIZATION, ACCESS_KEY))
        .set_json(json!({ "msg": "your code is 1234", "receiver": "+82 10-1000-2000" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 200);

    let service = ReconciliationService::new(
        repo.clone(),
        registry,
        ReconciliationConfig::default(),
    );
    let report = service.run_tick().await;

    assert!(report.errors.is_empty(), "errors: {:?}", report.errors);
    assert_eq!(report.dispatch.dispatched, 1);
    assert_eq!(gateway.message_count(), 1);

    let rows = repo.snapshot().await;
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0].status, MessageStatus::Started);
    assert_ne!(rows[0].message_id, UNSENT_MESSAGE_ID);
    assert!(rows[0].message_id.starts_with("mock_"));
}

#[actix_web::test]
async fn test_unsupported_message_never_reaches_scheduler() {
    let repo = Arc::new(InMemoryMessageRepository::new());
    let gateway = Arc::new(MockSmsGateway::new("RELAY"));
    let registry = GatewayRegistry::new().with(Region::Kr, gateway.clone());
    let router = Arc::new(RegionRouter::from_registry(&registry));

    let state = web::Data::new(AppState::new(repo.clone(), router, ACCESS_KEY));
    let metrics = web::Data::new(install_recorder().unwrap());
    let app = test::init_service(create_app(state, metrics)).await;

    let req = test::TestRequest::post()
        .uri("/send")
        .insert_header((header::AUTHORIZATION, ACCESS_KEY))
        .set_json(json!({ "msg": "hello", "receiver": "+639171234567" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 500);

    let service = ReconciliationService::new(repo.clone(), registry, ReconciliationConfig::default());
    let report = service.run_tick().await;

    assert!(report.is_idle());
    assert_eq!(gateway.message_count(), 0);
    assert!(repo.snapshot().await.is_empty());
}

#[actix_web::test]
async fn test_failed_dispatch_is_recorded() {
    let repo = Arc::new(InMemoryMessageRepository::new());
    let gateway = Arc::new(MockSmsGateway::failing());
    let registry = GatewayRegistry::new().with(Region::Ph, gateway);
    let router = Arc::new(RegionRouter::from_registry(&registry));

    let handle = install_recorder().unwrap();
    let state = web::Data::new(AppState::new(repo.clone(), router, ACCESS_KEY));
    let app = test::init_service(create_app(state, web::Data::new(handle.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/send")
        .insert_header((header::AUTHORIZATION, ACCESS_KEY))
        .set_json(json!({ "msg": "hello", "receiver": "+639171234567" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 200);

    let service = ReconciliationService::new(repo.clone(), registry, ReconciliationConfig::default());
    let report = service.run_tick().await;
    assert_eq!(report.dispatch.failed, 1);

    let rows = repo.snapshot().await;
    assert_eq!(rows[0].status, MessageStatus::Started);

    let rendered = handle.render();
    assert!(
        rendered
            .lines()
            .any(|line| line.starts_with("failure")
                && line.contains("stage=\"dispatch\"")
                && line.contains("region=\"PH\"")),
        "no dispatch failure in: {}",
        rendered
    );
}
