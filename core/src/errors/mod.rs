//! Domain-specific error types and error handling.

mod types;

pub use types::{ChannelError, ResendError, VerifyError};

use otp_shared::ConfigError;
use thiserror::Error;

/// Top-level errors returned by the OTP manager
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Resend(#[from] ResendError),
}

impl OtpError {
    /// Shorthand for a request validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for OtpError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

pub type OtpResult<T> = Result<T, OtpError>;
