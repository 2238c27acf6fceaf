use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use otp_core::domain::{ChannelDeliveryResult, DeliveryOptions, SessionState};
use otp_core::services::otp::{GenerateResult, SessionStatusView};
use otp_shared::identifier::mask_identifier;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

static CHANNEL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_\-]{1,32}$").expect("static channel pattern compiles"));

fn validate_channel_names(channels: &Vec<String>) -> Result<(), ValidationError> {
    if channels.iter().all(|name| CHANNEL_NAME.is_match(name)) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_channel_name"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Phone number, email address or device token
    #[validate(length(min = 1, max = 320))]
    pub identifier: String,

    /// Channel names to deliver on, in order of preference
    #[validate(length(min = 1, max = 8), custom = "validate_channel_names")]
    pub channels: Vec<String>,

    /// Email subject
    #[validate(length(max = 200))]
    #[serde(default)]
    pub subject: Option<String>,

    /// Free-form provider metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl SendOtpRequest {
    pub fn delivery_options(&self) -> DeliveryOptions {
        DeliveryOptions {
            subject: self.subject.clone(),
            metadata: self.metadata.clone(),
            ..DeliveryOptions::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, max = 64))]
    pub session_id: String,

    #[validate(length(min = 1, max = 32))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(length(min = 1, max = 64))]
    pub session_id: String,

    /// Override the session's original channels
    #[validate(length(max = 8), custom = "validate_channel_names")]
    #[serde(default)]
    pub channels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
    pub channels: Vec<ChannelDeliveryResult>,
    pub total_cost: f64,
    pub success: bool,
    /// Only present when the server is configured to expose codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl SendOtpResponse {
    pub fn from_result(result: GenerateResult, expose_code: bool) -> Self {
        Self {
            session_id: result.session_id,
            expires_at: result.expires_at,
            channels: result.channels,
            total_cost: result.total_cost,
            success: result.success,
            code: expose_code.then_some(result.code),
        }
    }
}

/// Status projection with the identifier masked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub identifier: String,
    pub channels: Vec<String>,
    pub deliveries: Vec<ChannelDeliveryResult>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
    pub max_attempts: u32,
    pub attempts_remaining: u32,
    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub status: SessionState,
}

impl From<SessionStatusView> for SessionStatusResponse {
    fn from(view: SessionStatusView) -> Self {
        Self {
            identifier: mask_identifier(&view.identifier),
            session_id: view.session_id,
            channels: view.channels,
            deliveries: view.deliveries,
            created_at: view.created_at,
            expires_at: view.expires_at,
            attempts: view.attempts,
            max_attempts: view.max_attempts,
            attempts_remaining: view.attempts_remaining,
            verified: view.verified,
            verified_at: view.verified_at,
            is_expired: view.is_expired,
            status: view.status,
        }
    }
}
