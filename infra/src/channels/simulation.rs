//! Simulated provider behaviour shared by every transport

use otp_core::errors::ChannelError;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::InfrastructureError;

/// Knobs for making a simulated transport slow or unreliable
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Probability in `[0, 1]` that the provider rejects a message
    #[serde(default)]
    pub failure_rate: f64,

    /// Reject every message
    #[serde(default)]
    pub simulate_failure: bool,

    /// Artificial provider latency (in milliseconds)
    #[serde(default)]
    pub latency_ms: u64,
}

impl SimulationSettings {
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    pub fn validate(&self, channel: &str) -> Result<(), InfrastructureError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(InfrastructureError::Config(format!(
                "channel '{}': failure_rate must be between 0 and 1, got {}",
                channel, self.failure_rate
            )));
        }
        Ok(())
    }

    /// Wait out the configured latency, then decide whether the provider accepts
    pub async fn apply(&self, channel: &str) -> Result<(), ChannelError> {
        if self.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;
        }

        if self.simulate_failure {
            return Err(ChannelError::delivery_failed(
                channel,
                "simulated provider failure",
            ));
        }

        if self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate) {
            return Err(ChannelError::delivery_failed(
                channel,
                "simulated provider rejection",
            ));
        }

        Ok(())
    }
}

/// Deserialize a channel's opaque settings block
pub(crate) fn parse_settings<T: DeserializeOwned>(
    channel: &str,
    value: &Value,
) -> Result<T, InfrastructureError> {
    T::deserialize(value).map_err(|source| InfrastructureError::ChannelSettings {
        channel: channel.to_string(),
        source,
    })
}
