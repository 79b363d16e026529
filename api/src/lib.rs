//! HTTP surface of the SMS relay
//!
//! Exposes the intake endpoint, the Prometheus scrape endpoint and a
//! liveness probe, plus the process wiring used by the binary.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod monitoring;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
