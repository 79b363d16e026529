use actix_web::HttpResponse;

/// Handler for GET /
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
