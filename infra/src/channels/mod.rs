//! Delivery Channel Module
//!
//! This module provides the simulated transports that deliver OTP codes, a
//! failover wrapper, and the factory that builds a channel registry from
//! configuration.
//!
//! ## Features
//!
//! - **SMS / Email / Push**: identifier validation and per-message cost
//! - **Failover**: primary/backup routing with a cool-down
//! - **Simulation**: configurable failure rate, forced failure and latency
//! - **Security**: identifiers are masked in logs, codes are never logged

use otp_core::services::otp::{ChannelRegistry, DeliveryChannel};
use otp_shared::{ChannelConfig, ChannelsConfig};
use std::sync::Arc;
use std::time::Duration;

pub mod email;
pub mod failover;
pub mod push;
pub mod simulation;
pub mod sms;

pub use email::{EmailChannel, EmailSettings};
pub use failover::{FailoverChannel, FailoverSettings};
pub use push::{PushChannel, PushSettings};
pub use simulation::SimulationSettings;
pub use sms::{SmsChannel, SmsSettings};

use crate::InfrastructureError;
use simulation::parse_settings;


/// Channel kinds understood by the factory
pub mod kinds {
    pub const SMS: &str = "sms";
    pub const EMAIL: &str = "email";
    pub const PUSH: &str = "push";
    pub const FAILOVER: &str = "failover";
}

/// Create a single transport channel from its configuration block
///
/// Returns `Ok(None)` for kinds this factory does not know, and for
/// `failover`, which needs the rest of the registry to resolve.
pub fn create_channel(
    name: &str,
    config: &ChannelConfig,
) -> Result<Option<Arc<dyn DeliveryChannel>>, InfrastructureError> {
    let settings = config.settings_value();
    let channel: Arc<dyn DeliveryChannel> = match config.kind.as_str() {
        kinds::SMS => Arc::new(SmsChannel::from_config(name, &settings)?),
        kinds::EMAIL => Arc::new(EmailChannel::from_config(name, &settings)?),
        kinds::PUSH => Arc::new(PushChannel::from_config(name, &settings)?),
        _ => return Ok(None),
    };
    Ok(Some(channel))
}

/// Build the channel registry from configuration
///
/// Disabled channels are skipped. Unknown kinds are skipped with a warning.
/// Failover channels are wired up after every plain channel exists and must
/// reference plain channels; a failover naming another failover is rejected.
pub fn build_channel_registry(
    config: &ChannelsConfig,
) -> Result<ChannelRegistry, InfrastructureError> {
    let mut registry = ChannelRegistry::new();
    let mut failovers = Vec::new();

    for (name, channel_config) in config.enabled() {
        if channel_config.kind == kinds::FAILOVER {
            failovers.push((name, channel_config));
            continue;
        }

        match create_channel(name, channel_config)? {
            Some(channel) => {
                tracing::info!(
                    channel = %name,
                    kind = %channel_config.kind,
                    "Registered delivery channel"
                );
                registry.register(name.clone(), channel);
            }
            None => {
                tracing::warn!(
                    channel = %name,
                    kind = %channel_config.kind,
                    "Unknown channel kind, skipping"
                );
            }
        }
    }

    // Resolve every failover against plain channels only, then register them
    let failover_names: Vec<&String> = failovers.iter().map(|(name, _)| *name).collect();
    let mut wired = Vec::with_capacity(failovers.len());

    for (name, channel_config) in failovers {
        let settings: FailoverSettings = parse_settings(name, &channel_config.settings_value())?;
        let primary = resolve(&registry, &failover_names, name, &settings.primary)?;
        let backup = resolve(&registry, &failover_names, name, &settings.backup)?;

        let channel = FailoverChannel::new(
            name.clone(),
            primary,
            backup,
            Duration::from_secs(settings.cooldown_seconds),
        );
        tracing::info!(
            channel = %name,
            primary = %settings.primary,
            backup = %settings.backup,
            "Registered failover channel"
        );
        wired.push((name.clone(), channel));
    }

    for (name, channel) in wired {
        registry.register(name, Arc::new(channel));
    }

    if registry.is_empty() {
        tracing::warn!("No delivery channels are enabled");
    }

    Ok(registry)
}

fn resolve(
    registry: &ChannelRegistry,
    failover_names: &[&String],
    channel: &str,
    target: &str,
) -> Result<Arc<dyn DeliveryChannel>, InfrastructureError> {
    if failover_names.iter().any(|name| name.as_str() == target) {
        return Err(InfrastructureError::NestedFailover {
            channel: channel.to_string(),
            target: target.to_string(),
        });
    }

    registry
        .get(target)
        .cloned()
        .ok_or_else(|| InfrastructureError::UnknownReference {
            channel: channel.to_string(),
            target: target.to_string(),
        })
}
