//! Error types for routing, gateway and store operations

use thiserror::Error;

/// Why a receiver could not be routed to a gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// The input is not a valid international phone number
    #[error("This is an invalid phone number")]
    InvalidFormat { receiver: String },

    /// The number is valid but no gateway serves its region
    #[error("This is an unsupported country")]
    UnsupportedRegion { region: Option<String> },
}

/// Failures talking to an SMS gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The gateway refused or could not accept the message
    #[error("{provider} rejected the request: {reason}")]
    SendFailed { provider: String, reason: String },

    #[error("{provider} did not answer in time")]
    Timeout { provider: String },

    /// Connection level failure before any answer was received
    #[error("Could not reach {provider}: {reason}")]
    Transport { provider: String, reason: String },

    /// The answer did not match the provider's documented schema
    #[error("Unexpected response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("{provider} does not support {capability}")]
    Unsupported {
        provider: String,
        capability: &'static str,
    },
}

impl GatewayError {
    pub fn send_failed(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SendFailed {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(provider: impl Into<String>, capability: &'static str) -> Self {
        Self::Unsupported {
            provider: provider.into(),
            capability,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, GatewayError::Unsupported { .. })
    }
}

/// Message store failures; all of them are retriable from the caller's view
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Message store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Message store constraint violated: {message}")]
    Constraint { message: String },

    /// A stored row could not be mapped back to a message
    #[error("Corrupt message row: {message}")]
    Corrupt { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}
