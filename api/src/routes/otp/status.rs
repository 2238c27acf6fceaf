use actix_web::{web, HttpResponse};
use otp_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::SessionStatusResponse;
use crate::handlers::ApiError;

/// Handler for GET /api/v1/otp/status/{session_id}
pub async fn session_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();

    let view = state
        .manager
        .get_session_status(&session_id)
        .await
        .ok_or(ApiError::SessionNotFound)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SessionStatusResponse::from(view))))
}
