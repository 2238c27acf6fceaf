use actix_web::{web, HttpResponse};
use otp_shared::ApiResponse;

use crate::app::AppState;

/// Handler for GET /api/v1/otp/stats
pub async fn otp_stats(state: web::Data<AppState>) -> HttpResponse {
    let stats = state.manager.get_stats().await;
    HttpResponse::Ok().json(ApiResponse::success(stats))
}
