use actix_web::{web, HttpResponse};
use otp_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::ResendOtpRequest;
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/resend
///
/// Omitting `channels` (or sending an empty list) reuses the session's
/// original channels.
pub async fn resend_otp(
    state: web::Data<AppState>,
    request: web::Json<ResendOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let result = state
        .manager
        .resend(request.session_id.trim(), request.channels.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}
