//! Error types for verification, resend and channel delivery
//!
//! Each variant maps to a stable machine-readable code from
//! `otp_shared::error_codes` so adapters never match on messages.

use otp_shared::error_codes;
use thiserror::Error;

/// Outcomes of a rejected verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Invalid or unknown OTP session")]
    InvalidSession,

    #[error("OTP has already been used")]
    AlreadyUsed,

    #[error("Maximum verification attempts exceeded")]
    MaxAttemptsExceeded,

    #[error("OTP has expired")]
    Expired,

    #[error("Invalid OTP code, {attempts_remaining} attempt(s) remaining")]
    InvalidCode { attempts_remaining: u32 },
}

impl VerifyError {
    /// Whether submitting another code for the same session can still succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InvalidCode { .. })
    }

    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSession => error_codes::INVALID_SESSION,
            Self::AlreadyUsed => error_codes::ALREADY_USED,
            Self::MaxAttemptsExceeded => error_codes::MAX_ATTEMPTS_EXCEEDED,
            Self::Expired => error_codes::EXPIRED,
            Self::InvalidCode { .. } => error_codes::INVALID_CODE,
        }
    }
}

/// Reasons a resend request is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResendError {
    #[error("OTP session not found")]
    SessionNotFound,

    #[error("OTP session is already verified")]
    AlreadyVerified,

    #[error("OTP session has expired")]
    SessionExpired,
}

impl ResendError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionNotFound => error_codes::SESSION_NOT_FOUND,
            Self::AlreadyVerified => error_codes::ALREADY_VERIFIED,
            Self::SessionExpired => error_codes::SESSION_EXPIRED,
        }
    }
}

/// Failure reported by a single delivery channel
///
/// Always captured in that channel's delivery result; never aborts
/// deliveries on sibling channels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Delivery via '{channel}' failed: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("Identifier rejected by '{channel}': {reason}")]
    InvalidIdentifier { channel: String, reason: String },

    #[error("Channel '{channel}' is not configured")]
    UnsupportedChannel { channel: String },
}

impl ChannelError {
    pub fn delivery_failed(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_identifier(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}
