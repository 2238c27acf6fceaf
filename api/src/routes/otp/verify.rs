use actix_web::{web, HttpResponse};
use otp_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::VerifyOtpRequest;
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/verify
///
/// ## Errors
/// - 400 `INVALID_CODE` with `attempts_remaining` in the error context
/// - 404 `INVALID_SESSION`
/// - 409 `ALREADY_USED`
/// - 410 `EXPIRED`
/// - 429 `MAX_ATTEMPTS_EXCEEDED`
pub async fn verify_otp(
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let verified = state
        .manager
        .verify(request.session_id.trim(), request.code.trim())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(verified)))
}
