//! OTP lifecycle configuration
//!
//! Covers code shape, expiry window, attempt budget and the background
//! cleanup sweep interval.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Longest numeric code whose range still fits in a `u64`
pub const MAX_OTP_LENGTH: usize = 18;

/// Longest expiry window accepted, one day
pub const MAX_EXPIRY_MINUTES: f64 = 24.0 * 60.0;

/// Code generation and verification settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OtpSettings {
    /// Number of characters in a generated code
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,

    /// Minutes a session stays verifiable after creation
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: f64,

    /// Verification attempts allowed per session
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Generate codes from an alphanumeric alphabet instead of digits
    #[serde(default)]
    pub alphanumeric: bool,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            otp_length: default_otp_length(),
            expiry_minutes: default_expiry_minutes(),
            max_attempts: default_max_attempts(),
            alphanumeric: false,
        }
    }
}

impl OtpSettings {
    /// Create settings with the given length, expiry and attempt budget
    pub fn new(otp_length: usize, expiry_minutes: f64, max_attempts: u32) -> Self {
        Self {
            otp_length,
            expiry_minutes,
            max_attempts,
            alphanumeric: false,
        }
    }

    /// Switch to alphanumeric codes
    pub fn with_alphanumeric(mut self, alphanumeric: bool) -> Self {
        self.alphanumeric = alphanumeric;
        self
    }

    /// Expiry window as a chrono duration, rounded to whole milliseconds
    pub fn expiry_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds((self.expiry_minutes * 60_000.0).round() as i64)
    }

    /// Reject values the manager cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.otp_length == 0 || self.otp_length > MAX_OTP_LENGTH {
            return Err(ConfigError::invalid(
                "otp.otp_length",
                format!("must be between 1 and {}", MAX_OTP_LENGTH),
            ));
        }
        if !self.expiry_minutes.is_finite() || self.expiry_minutes <= 0.0 {
            return Err(ConfigError::invalid(
                "otp.expiry_minutes",
                "must be a positive number",
            ));
        }
        if self.expiry_minutes > MAX_EXPIRY_MINUTES {
            return Err(ConfigError::invalid(
                "otp.expiry_minutes",
                format!("must not exceed {} minutes", MAX_EXPIRY_MINUTES),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "otp.max_attempts",
                "must be a positive integer",
            ));
        }
        Ok(())
    }
}

/// Background cleanup sweep settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// Whether the periodic sweep runs at all
    #[serde(default = "default_cleanup_enabled")]
    pub enabled: bool,

    /// How often to sweep (in seconds)
    #[serde(default = "default_cleanup_interval")]
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: default_cleanup_enabled(),
            interval_seconds: default_cleanup_interval(),
        }
    }
}

fn default_otp_length() -> usize {
    6
}

fn default_expiry_minutes() -> f64 {
    5.0
}

fn default_max_attempts() -> u32 {
    3
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    300 // 5 minutes
}
