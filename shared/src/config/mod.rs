//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `otp` - Code generation, expiry, attempt budget and cleanup sweep
//! - `channels` - Per-channel delivery configuration blocks
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and adapter configuration

pub mod channels;
pub mod environment;
pub mod otp;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use channels::{ChannelConfig, ChannelsConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{CleanupConfig, OtpSettings, MAX_EXPIRY_MINUTES, MAX_OTP_LENGTH};
pub use server::{HttpConfig, ServerConfig};

/// Prefix for environment variable overrides, e.g. `OTP__OTP__MAX_ATTEMPTS=5`
pub const ENV_PREFIX: &str = "OTP";

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    /// Create an invalid-value error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// OTP lifecycle configuration
    #[serde(default)]
    pub otp: OtpSettings,

    /// Cleanup sweep configuration
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Delivery channels
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// HTTP adapter configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig::default(),
            otp: OtpSettings::default(),
            cleanup: CleanupConfig::default(),
            channels: ChannelsConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration from defaults, an optional environment file and env vars
    ///
    /// Sources are layered in this order, later ones winning:
    /// 1. Built-in defaults for the detected environment
    /// 2. `config/{environment}.toml` (optional)
    /// 3. `OTP__`-prefixed environment variables (`__` separates nesting levels)
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let defaults = config::Config::try_from(&Self::for_environment(environment))?;

        let loaded: AppConfig = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(environment.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate the sections that have invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.otp.validate()?;
        if self.cleanup.enabled && self.cleanup.interval_seconds == 0 {
            return Err(ConfigError::invalid(
                "cleanup.interval_seconds",
                "must be positive when cleanup is enabled",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_zero_cleanup_interval_rejected() {
        let mut config = AppConfig::default();
        config.cleanup.interval_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "cleanup.interval_seconds"
        ));

        config.cleanup.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_layered_sources_override_defaults() {
        let defaults = config::Config::try_from(&AppConfig::default()).unwrap();
        let loaded: AppConfig = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from_str(
                r#"
                [otp]
                otp_length = 8
                max_attempts = 5

                [channels.sms]
                kind = "sms"
                cost_per_message = 0.02
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(loaded.otp.otp_length, 8);
        assert_eq!(loaded.otp.max_attempts, 5);
        assert_eq!(loaded.otp.expiry_minutes, 5.0);
        assert_eq!(
            loaded.channels.get("sms").unwrap().settings["cost_per_message"],
            0.02
        );
        assert!(loaded.channels.get("email").is_some());
    }
}
