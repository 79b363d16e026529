//! # Infrastructure Layer
//!
//! Concrete implementations of the relay's outbound ports:
//! - **Database**: MySQL message store using SQLx, plus an in-memory store
//! - **SMS**: Semaphore (PH) and Aligo (KR) gateway clients over reqwest

// Re-export core types for convenience
pub use relay_core::errors::*;

/// Database module - message store implementations
pub mod database;

/// SMS gateway module - provider clients and registry construction
pub mod sms;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
