//! CORS middleware configuration for cross-origin requests.
//!
//! The relay is called from browser dashboards on arbitrary origins, so any
//! origin may use the intake and metrics endpoints.

use actix_cors::Cors;
use actix_web::http::{header, Method};

/// Default preflight cache lifetime in seconds
const MAX_AGE: usize = 3600;

/// Creates the CORS middleware: any origin, `GET`/`POST`/`OPTIONS`, and the
/// `Content-Type` and `Authorization` request headers.
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(MAX_AGE)
}
