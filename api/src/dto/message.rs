//! Payloads of `POST /send`

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of a send request
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SendMessageRequest {
    /// Message text
    #[validate(length(min = 1, message = "msg is required"))]
    pub msg: String,

    /// Receiver in international format, e.g. `+82 10-1000-2000`
    #[validate(length(min = 1, message = "receiver is required"))]
    pub receiver: String,
}

/// Acknowledgement returned once the message is stored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SendMessageResponse {
    pub code: String,
    pub message: String,
}

impl SendMessageResponse {
    pub fn saved() -> Self {
        Self {
            code: "1".to_string(),
            message: "saved".to_string(),
        }
    }
}
