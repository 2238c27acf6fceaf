//! Domain entities representing core business objects.

pub mod otp_session;

#[cfg(test)]
mod tests;

pub use otp_session::{OtpSession, SessionState};
