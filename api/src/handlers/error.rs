//! Mapping from domain errors to HTTP responses

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use otp_core::errors::{OtpError, ResendError, VerifyError};
use otp_shared::{error_codes, ApiResponse, ErrorDetail};
use std::collections::HashMap;
use validator::ValidationErrors;

/// Errors surfaced by the HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Resend(#[from] ResendError),

    #[error("OTP session not found")]
    SessionNotFound,

    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Internal server error")]
    Internal,
}

impl From<OtpError> for ApiError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::Validation { message } => ApiError::InvalidRequest { message },
            OtpError::Verify(err) => ApiError::Verify(err),
            OtpError::Resend(err) => ApiError::Resend(err),
            OtpError::Configuration { message } => {
                tracing::error!(error = %message, "Configuration error while handling request");
                ApiError::Internal
            }
        }
    }
}

impl ApiError {
    fn detail(&self) -> ErrorDetail {
        match self {
            ApiError::Validation(errors) => {
                ErrorDetail::new(error_codes::VALIDATION_ERROR, self.to_string())
                    .with_fields(field_messages(errors))
            }
            ApiError::BadRequest(message) => {
                ErrorDetail::new(error_codes::BAD_REQUEST, message.clone())
            }
            ApiError::InvalidRequest { message } => {
                ErrorDetail::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            ApiError::Verify(err) => {
                let detail = ErrorDetail::new(err.code(), err.to_string())
                    .with_context("retryable", err.is_retryable());
                match err {
                    VerifyError::InvalidCode { attempts_remaining } => {
                        detail.with_context("attempts_remaining", attempts_remaining)
                    }
                    _ => detail,
                }
            }
            ApiError::Resend(err) => ErrorDetail::new(err.code(), err.to_string()),
            ApiError::SessionNotFound => {
                ErrorDetail::new(error_codes::SESSION_NOT_FOUND, self.to_string())
            }
            ApiError::Internal => ErrorDetail::new(error_codes::INTERNAL_ERROR, self.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::InvalidRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Verify(err) => match err {
                VerifyError::InvalidCode { .. } => StatusCode::BAD_REQUEST,
                VerifyError::InvalidSession => StatusCode::NOT_FOUND,
                VerifyError::AlreadyUsed => StatusCode::CONFLICT,
                VerifyError::Expired => StatusCode::GONE,
                VerifyError::MaxAttemptsExceeded => StatusCode::TOO_MANY_REQUESTS,
            },
            ApiError::Resend(err) => match err {
                ResendError::SessionNotFound => StatusCode::NOT_FOUND,
                ResendError::AlreadyVerified => StatusCode::CONFLICT,
                ResendError::SessionExpired => StatusCode::GONE,
            },
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.detail()))
    }
}

fn field_messages(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Turn malformed JSON bodies into the standard error envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}
