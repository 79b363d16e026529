//! API errors and their envelope representation
//!
//! Every outcome is reported with HTTP 200; the envelope `code` tells the
//! caller what happened.

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::warn;
use validator::ValidationErrors;

use relay_core::errors::{RoutingError, StoreError};
use relay_core::services::recording;
use relay_shared::ApiEnvelope;

/// Envelope codes
pub mod codes {
    pub const SUCCESS: u16 = 200;
    pub const INVALID_ACCESS_KEY: u16 = 400;
    pub const PROCESSING_ERROR: u16 = 500;
    pub const INVALID_PARAMETERS: u16 = 501;
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or a required field missing
    #[error("{message}")]
    InvalidParameters { message: String },

    #[error("The access key entered is not valid.")]
    InvalidAccessKey,

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            ApiError::InvalidParameters { .. } => codes::INVALID_PARAMETERS,
            ApiError::InvalidAccessKey => codes::INVALID_ACCESS_KEY,
            ApiError::Routing(_) | ApiError::Store(_) => codes::PROCESSING_ERROR,
        }
    }

    /// Short label for the intake failure metric
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::InvalidParameters { .. } => "invalid_parameters",
            ApiError::InvalidAccessKey => "invalid_access_key",
            ApiError::Routing(RoutingError::InvalidFormat { .. }) => "invalid_number",
            ApiError::Routing(RoutingError::UnsupportedRegion { .. }) => "unsupported_region",
            ApiError::Store(_) => "store",
        }
    }

    pub fn envelope(&self) -> ApiEnvelope<()> {
        ApiEnvelope::failure(self.code(), self.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();

        Self::invalid_parameters(messages.join(", "))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Ok().json(self.envelope())
    }
}

/// Turn body extraction failures into a 501 envelope
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = %req.path(), error = %err, "Rejected request body");
    let error = ApiError::invalid_parameters(err.to_string());
    recording::record_rejected(error.reason());
    error.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::invalid_parameters("x").code(), 501);
        assert_eq!(ApiError::InvalidAccessKey.code(), 400);
        assert_eq!(
            ApiError::from(RoutingError::InvalidFormat {
                receiver: "1".to_string()
            })
            .code(),
            500
        );
        assert_eq!(ApiError::from(StoreError::unavailable("down")).code(), 500);
    }

    #[test]
    fn test_routing_messages_pass_through() {
        let error = ApiError::from(RoutingError::UnsupportedRegion { region: None });
        let envelope = error.envelope();

        assert_eq!(envelope.code, 500);
        assert_eq!(
            envelope.error.unwrap().message,
            "This is an unsupported country"
        );
    }

    #[test]
    fn test_reasons_split_routing_failures() {
        assert_eq!(
            ApiError::from(RoutingError::UnsupportedRegion { region: None }).reason(),
            "unsupported_region"
        );
        assert_eq!(
            ApiError::from(RoutingError::InvalidFormat {
                receiver: "1".to_string()
            })
            .reason(),
            "invalid_number"
        );
        assert_eq!(ApiError::InvalidAccessKey.reason(), "invalid_access_key");
    }

    #[test]
    fn test_errors_are_http_200() {
        assert_eq!(ApiError::InvalidAccessKey.status_code(), StatusCode::OK);
        assert_eq!(
            ApiError::InvalidAccessKey.error_response().status(),
            StatusCode::OK
        );
    }
}
