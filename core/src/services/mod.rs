//! Business services containing domain logic and use cases.
//!
//! - `routing` - receiver to region resolution
//! - `gateway` - provider capability contract and region registry
//! - `scheduler` - dispatch and delivery reconciliation loop
//! - `recording` - metric names shared with the HTTP surface

pub mod gateway;
pub mod recording;
pub mod routing;
pub mod scheduler;

// Re-export commonly used types
pub use gateway::{GatewayRegistry, SmsGateway};
pub use routing::{RegionRouter, ResolvedNumber};
pub use scheduler::{
    DispatchReport, ReconcileReport, ReconciliationConfig, ReconciliationService,
    SchedulerRunner, TickReport,
};
