//! Gateway contract shared by the scheduler and the provider clients
//!
//! - `SmsGateway` - send and status-query capabilities of one provider
//! - `GatewayRegistry` - which provider serves which region

mod registry;
mod traits;

pub use registry::GatewayRegistry;
pub use traits::SmsGateway;
