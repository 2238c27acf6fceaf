//! OTP session entity and its verification state machine.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::{ChannelDeliveryResult, DeliveryOptions};
use crate::errors::VerifyError;

/// Externally visible lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Pending,
    Verified,
    Expired,
    MaxAttemptsExceeded,
}

/// Stateful record tracking one issued code
///
/// The code is fixed at creation and never leaves the crate except through
/// the generate result; `Debug` output redacts it.
#[derive(Clone)]
pub struct OtpSession {
    /// Opaque unique id handed to the caller
    pub session_id: String,

    /// Destination address or token
    pub identifier: String,

    code: String,

    /// Channels requested at creation, de-duplicated in request order
    pub channels: Vec<String>,

    /// Options used at creation, reused on resend
    pub options: DeliveryOptions,

    /// Append-only delivery history from generate and every resend
    pub deliveries: Vec<ChannelDeliveryResult>,

    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,

    /// Verification attempts that reached the comparison step
    pub attempts: u32,
    pub max_attempts: u32,

    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
}

impl OtpSession {
    /// Create a pending session
    pub fn new(
        session_id: String,
        identifier: String,
        code: String,
        channels: Vec<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        max_attempts: u32,
    ) -> Self {
        Self {
            session_id,
            identifier,
            code,
            channels,
            options: DeliveryOptions::default(),
            deliveries: Vec::new(),
            created_at,
            expires_at,
            attempts: 0,
            max_attempts,
            verified: false,
            verified_at: None,
        }
    }

    pub fn with_options(mut self, options: DeliveryOptions) -> Self {
        self.options = options;
        self
    }

    pub(crate) fn code(&self) -> &str {
        &self.code
    }

    /// Strictly past `expires_at`; the boundary instant is still valid
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Unverified and not yet expired
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.verified && !self.is_expired(now)
    }

    /// Unverified and expired, i.e. eligible for the cleanup sweep
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        !self.verified && self.is_expired(now)
    }

    /// Derived state, checked in order: verified, expired, exhausted, pending
    pub fn state(&self, now: DateTime<Utc>) -> SessionState {
        if self.verified {
            SessionState::Verified
        } else if self.is_expired(now) {
            SessionState::Expired
        } else if self.attempts_exhausted() {
            SessionState::MaxAttemptsExceeded
        } else {
            SessionState::Pending
        }
    }

    /// Run one verification attempt against this session
    ///
    /// Returns the number of attempts used on success. `MaxAttemptsExceeded`
    /// and `Expired` mean the caller must discard the session.
    pub fn verify(&mut self, candidate: &str, now: DateTime<Utc>) -> Result<u32, VerifyError> {
        if self.verified {
            return Err(VerifyError::AlreadyUsed);
        }

        if self.attempts_exhausted() {
            return Err(VerifyError::MaxAttemptsExceeded);
        }

        if self.is_expired(now) {
            return Err(VerifyError::Expired);
        }

        self.attempts += 1;

        if constant_time_eq(self.code.as_bytes(), candidate.as_bytes()) {
            self.verified = true;
            self.verified_at = Some(now);
            Ok(self.attempts)
        } else {
            Err(VerifyError::InvalidCode {
                attempts_remaining: self.attempts_remaining(),
            })
        }
    }

    /// Append delivery outcomes to the history
    pub fn record_deliveries(&mut self, results: &[ChannelDeliveryResult]) {
        self.deliveries.extend_from_slice(results);
    }
}

impl fmt::Debug for OtpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpSession")
            .field("session_id", &self.session_id)
            .field("identifier", &self.identifier)
            .field("code", &"<redacted>")
            .field("channels", &self.channels)
            .field("deliveries", &self.deliveries.len())
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("attempts", &self.attempts)
            .field("max_attempts", &self.max_attempts)
            .field("verified", &self.verified)
            .finish()
    }
}
