//! Route handlers
//!
//! - `POST /send` - accept a message for delivery
//! - `GET /metrics` - Prometheus scrape
//! - `GET /` - liveness probe

pub mod health;
pub mod message;
pub mod metrics;

pub use health::health_check;
pub use message::send_message;
pub use metrics::render_metrics;
