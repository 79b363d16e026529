//! API response envelope

use serde::{Deserialize, Serialize};

/// Envelope wrapping every API reply
///
/// The HTTP status is always 200; `code` carries the outcome
/// (200 success, 400 bad access key, 500 processing error, 501 invalid
/// parameters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Error payload carried by a failed envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T> ApiEnvelope<T> {
    /// Create a successful envelope
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failed envelope with the given outcome code
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            error: Some(ErrorBody::new(message)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 200 && self.error.is_none()
    }
}
