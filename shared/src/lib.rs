//! Shared configuration and common types for the SMS relay
//!
//! This crate provides functionality used across all relay crates:
//! - Configuration types and loading
//! - Error types for configuration handling
//! - The response envelope returned by the HTTP surface
//! - Phone number helpers (normalization, masking for logs)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AccessConfig, AppConfig, DatabaseConfig, GatewayConfig, GatewayItemConfig, LoggingConfig,
    SchedulerConfig, SchedulerJobConfig, ServerConfig,
};
pub use errors::ConfigError;
pub use types::{ApiEnvelope, ErrorBody};
pub use utils::phone;
