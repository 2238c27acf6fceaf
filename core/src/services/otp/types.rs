//! Result types for OTP manager operations

use chrono::{DateTime, Utc};
use otp_shared::OtpSettings;
use serde::Serialize;

use crate::domain::entities::{OtpSession, SessionState};
use crate::domain::value_objects::ChannelDeliveryResult;

/// Result of creating a session and dispatching its code
///
/// Carries the plaintext code; adapters decide whether to expose it.
#[derive(Clone, Serialize)]
pub struct GenerateResult {
    pub session_id: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    /// One entry per requested channel, in request order
    pub channels: Vec<ChannelDeliveryResult>,
    pub total_cost: f64,
    /// True if at least one channel delivered
    pub success: bool,
}

impl std::fmt::Debug for GenerateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateResult")
            .field("session_id", &self.session_id)
            .field("code", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("channels", &self.channels)
            .field("total_cost", &self.total_cost)
            .field("success", &self.success)
            .finish()
    }
}

/// Result of redelivering an existing code
#[derive(Debug, Clone, Serialize)]
pub struct ResendResult {
    pub session_id: String,
    pub channels: Vec<ChannelDeliveryResult>,
    pub total_cost: f64,
    pub success: bool,
}

/// Successful verification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifySuccess {
    pub session_id: String,
    pub identifier: String,
    pub attempts_used: u32,
    pub verified_at: DateTime<Utc>,
}

/// Read-only projection of a session; never includes the code
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusView {
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

impl SessionStatusView {
    pub fn from_session(session: &OtpSession, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session.session_id.clone(),
            identifier: session.identifier.clone(),
            channels: session.channels.clone(),
            deliveries: session.deliveries.clone(),
            created_at: session.created_at,
            expires_at: session.expires_at,
            attempts: session.attempts,
            max_attempts: session.max_attempts,
            attempts_remaining: session.attempts_remaining(),
            verified: session.verified,
            verified_at: session.verified_at,
            is_expired: session.is_expired(now),
            status: session.state(now),
        }
    }
}

/// Snapshot of store contents
///
/// Every session is counted in exactly one of active, expired or verified.
#[derive(Debug, Clone, Serialize)]
pub struct OtpStats {
    pub total_sessions: usize,
    pub active_sessions: usize,
    pub expired_sessions: usize,
    pub verified_sessions: usize,
    pub channels: Vec<String>,
    pub config: OtpSettings,
}
