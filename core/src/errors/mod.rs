//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{GatewayError, RoutingError, StoreError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A region is routable but has no gateway registered
    #[error("No gateway configured for region {region}")]
    NotConfigured { region: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DomainResult<T> = Result<T, DomainError>;
