//! # OtpRelay Core
//!
//! Core business logic for the OtpRelay service.
//! This crate contains the OTP session entity, the code generator, the
//! delivery channel capability, the session manager and its verification
//! state machine, the cleanup service, and the error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
