use actix_web::{web, HttpResponse};
use otp_shared::ApiResponse;
use validator::Validate;

use crate::app::AppState;
use crate::dto::{SendOtpRequest, SendOtpResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/send
///
/// Creates a session and delivers its code on every requested channel.
///
/// # Request Body
///
/// ```json
/// {
///     "identifier": "+15551234567",
///     "channels": ["sms", "email"],
///     "subject": "Your login code"
/// }
/// ```
///
/// # Response
///
/// Always 200 once the session exists. `data.success` is false when no
/// channel accepted the code; per-channel errors are listed in
/// `data.channels`. The code itself is only included when
/// `http.expose_code` is enabled.
pub async fn send_otp(
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;

    let result = state
        .manager
        .generate_and_send(&request.identifier, &request.channels, request.delivery_options())
        .await?;

    let response = SendOtpResponse::from_result(result, state.http.expose_code);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
