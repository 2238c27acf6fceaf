//! Shared utilities and common types for the OtpRelay server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the layered loader
//! - Error codes and the API response envelope
//! - Identifier validation and masking (phone, email, device token)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ChannelConfig, ChannelsConfig, CleanupConfig, ConfigError, Environment,
    HttpConfig, LogFormat, LoggingConfig, OtpSettings, ServerConfig, MAX_EXPIRY_MINUTES,
    MAX_OTP_LENGTH,
};
pub use errors::error_codes;
pub use types::{ApiResponse, ErrorDetail, HealthResponse, HealthStatus};
pub use utils::{identifier, phone};
