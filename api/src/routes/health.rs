use actix_web::HttpResponse;
use chrono::Utc;
use otp_shared::{ApiResponse, HealthResponse, HealthStatus};

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
