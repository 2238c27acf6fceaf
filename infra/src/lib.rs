//! # Infrastructure Layer
//!
//! This crate provides the concrete delivery channels for OtpRelay and the
//! factory that turns configuration into a channel registry.
//!
//! ## Channels
//!
//! - **SMS**: E.164 validation, per-message cost, templated body
//! - **Email**: address validation, subject from delivery options
//! - **Push**: device token validation
//! - **Failover**: routes to a backup channel while the primary is cooling down
//!
//! All transports are simulated. Each can be configured with a failure rate,
//! a forced failure switch and an artificial latency.

pub mod channels;

pub use channels::{
    build_channel_registry, create_channel, EmailChannel, FailoverChannel, PushChannel,
    SimulationSettings, SmsChannel,
};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A channel's settings block could not be parsed
    #[error("Invalid settings for channel '{channel}': {source}")]
    ChannelSettings {
        channel: String,
        #[source]
        source: serde_json::Error,
    },

    /// A failover channel references a channel that is not registered
    #[error("Channel '{channel}' references unknown channel '{target}'")]
    UnknownReference { channel: String, target: String },

    /// A failover channel references another failover channel
    #[error("Failover channel '{channel}' cannot wrap failover channel '{target}'")]
    NestedFailover { channel: String, target: String },
}
