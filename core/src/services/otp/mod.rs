//! OTP lifecycle service module
//!
//! This module provides the complete one-time-password workflow:
//! - Secure code generation
//! - Concurrent multi-channel delivery
//! - Attempt-limited verification with expiry
//! - Resend of the existing code
//! - Periodic cleanup of expired sessions

mod channel;
mod cleanup;
mod generator;
mod manager;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use channel::{ChannelRegistry, DeliveryChannel, DeliveryOptions, DeliveryReceipt};
pub use cleanup::{CleanupResult, OtpCleanupService};
pub use generator::{new_correlation_id, CodeAlphabet, CodeGenerator, GeneratedCode};
pub use manager::OtpManager;
pub use store::SessionStore;
pub use types::{GenerateResult, OtpStats, ResendResult, SessionStatusView, VerifySuccess};
