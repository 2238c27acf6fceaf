//! Secure code generation
//!
//! Codes come exclusively from `OsRng`. Correlation ids are produced by
//! [`new_correlation_id`] and never share a code path with secret codes.

use chrono::{DateTime, Duration, Utc};
use otp_shared::{OtpSettings, MAX_OTP_LENGTH};
use rand::{rngs::OsRng, Rng};
use uuid::Uuid;

use crate::errors::{OtpError, OtpResult};

/// Uppercase letters and digits without look-alikes (0/O, 1/I/L)
const UNAMBIGUOUS_CHARSET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

/// Character set a code is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeAlphabet {
    /// Decimal digits, never starting with zero
    Numeric,
    /// Unambiguous uppercase letters and digits
    Alphanumeric,
}

/// A freshly generated code paired with its expiry
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Generator for fixed-length one-time codes
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    length: usize,
    alphabet: CodeAlphabet,
}

impl CodeGenerator {
    /// Create a generator, rejecting lengths outside `1..=18`
    pub fn new(length: usize, alphabet: CodeAlphabet) -> OtpResult<Self> {
        if length == 0 || length > MAX_OTP_LENGTH {
            return Err(OtpError::Configuration {
                message: format!(
                    "OTP length must be between 1 and {}, got {}",
                    MAX_OTP_LENGTH, length
                ),
            });
        }
        Ok(Self { length, alphabet })
    }

    pub fn from_settings(settings: &OtpSettings) -> OtpResult<Self> {
        let alphabet = if settings.alphanumeric {
            CodeAlphabet::Alphanumeric
        } else {
            CodeAlphabet::Numeric
        };
        Self::new(settings.otp_length, alphabet)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> CodeAlphabet {
        self.alphabet
    }

    /// Generate a code
    pub fn generate(&self) -> String {
        match self.alphabet {
            CodeAlphabet::Numeric => Self::numeric(self.length),
            CodeAlphabet::Alphanumeric => Self::alphanumeric(self.length),
        }
    }

    /// Generate a code that expires `window` after `now`
    ///
    /// # Returns
    ///
    /// * `Err(OtpError::Configuration)` - If `now + window` is not representable
    pub fn generate_with_expiry(
        &self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> OtpResult<GeneratedCode> {
        let expires_at = now
            .checked_add_signed(window)
            .ok_or_else(|| OtpError::Configuration {
                message: format!("expiry window of {} overflows the clock", window),
            })?;

        Ok(GeneratedCode {
            code: self.generate(),
            expires_at,
        })
    }

    // Uniform over [10^(n-1), 10^n - 1]; gen_range rejection-samples so
    // there is no modulo bias.
    fn numeric(length: usize) -> String {
        let exponent = (length - 1) as u32;
        let low = 10u64.pow(exponent);
        let high = low * 10 - 1;
        OsRng.gen_range(low..=high).to_string()
    }

    fn alphanumeric(length: usize) -> String {
        (0..length)
            .map(|_| {
                let idx = OsRng.gen_range(0..UNAMBIGUOUS_CHARSET.len());
                UNAMBIGUOUS_CHARSET[idx] as char
            })
            .collect()
    }
}

/// New opaque id for sessions and deliveries
pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}
