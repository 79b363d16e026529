//! Message intake

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, warn};
use validator::Validate;

use relay_core::domain::entities::{NewMessage, Region};
use relay_core::repositories::MessageRepository;
use relay_core::services::recording;
use relay_shared::phone::mask_phone_number;
use relay_shared::ApiEnvelope;

use crate::app::AppState;
use crate::dto::{SendMessageRequest, SendMessageResponse};
use crate::handlers::ApiError;

/// Handler for POST /send
///
/// Validates the body, checks the access key carried verbatim in the
/// `Authorization` header, routes the receiver to a region and stores the
/// message as `started` for the scheduler to pick up.
///
/// # Request Body
///
/// ```json
/// { "msg": "hello", "receiver": "+82 10-1000-2000" }
/// ```
///
/// # Response
///
/// ```json
/// { "code": 200, "data": { "code": "1", "message": "saved" } }
/// ```
pub async fn send_message<R>(
    req: HttpRequest,
    state: web::Data<AppState<R>>,
    body: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, ApiError>
where
    R: MessageRepository + 'static,
{
    match accept(&req, &state, body.into_inner()).await {
        Ok(region) => {
            recording::record_accepted(region);
            Ok(HttpResponse::Ok().json(ApiEnvelope::success(SendMessageResponse::saved())))
        }
        Err(e) => {
            recording::record_rejected(e.reason());
            Err(e)
        }
    }
}

async fn accept<R>(
    req: &HttpRequest,
    state: &AppState<R>,
    request: SendMessageRequest,
) -> Result<Region, ApiError>
where
    R: MessageRepository + 'static,
{
    request.validate()?;

    authorize(req, &state.access_key)?;

    let resolved = state.router.resolve(&request.receiver).map_err(|e| {
        warn!(
            receiver = %mask_phone_number(&request.receiver),
            error = %e,
            "Rejected receiver"
        );
        e
    })?;

    let region = resolved.region;
    let receiver = resolved.national_number;
    let masked = mask_phone_number(&receiver);

    let sequence = state
        .repository
        .insert(NewMessage::new(receiver, request.msg, region))
        .await?;

    info!(sequence, region = %region, receiver = %masked, "Message saved");

    Ok(region)
}

fn authorize(req: &HttpRequest, access_key: &str) -> Result<(), ApiError> {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if !access_key.is_empty() && key == access_key => Ok(()),
        _ => {
            warn!(path = %req.path(), "Rejected access key");
            Err(ApiError::InvalidAccessKey)
        }
    }
}
