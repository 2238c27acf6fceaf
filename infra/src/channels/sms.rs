//! Simulated SMS transport

use async_trait::async_trait;
use otp_core::errors::ChannelError;
use otp_core::services::otp::{DeliveryChannel, DeliveryOptions, DeliveryReceipt};
use otp_shared::phone::{is_valid_phone, mask_phone_number, normalize_phone_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use uuid::Uuid;

use super::simulation::{parse_settings, SimulationSettings};
use crate::InfrastructureError;

const DEFAULT_TEMPLATE: &str = "Your verification code is {code}. It expires in {minutes} minutes.";

/// SMS channel settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SmsSettings {
    /// Sender number shown to the recipient
    #[serde(default = "default_from_number")]
    pub from_number: String,

    /// Cost charged per message
    #[serde(default = "default_cost")]
    pub cost_per_message: f64,

    #[serde(default, flatten)]
    pub simulation: SimulationSettings,
}

impl Default for SmsSettings {
    fn default() -> Self {
        Self {
            from_number: default_from_number(),
            cost_per_message: default_cost(),
            simulation: SimulationSettings::default(),
        }
    }
}

fn default_from_number() -> String {
    "+15550000000".to_string()
}

fn default_cost() -> f64 {
    0.0075
}

/// SMS channel that validates E.164 numbers and simulates a provider
pub struct SmsChannel {
    name: String,
    settings: SmsSettings,
    message_count: AtomicU64,
}

impl SmsChannel {
    pub fn new(name: impl Into<String>, settings: SmsSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            message_count: AtomicU64::new(0),
        }
    }

    /// Build from an opaque configuration block
    pub fn from_config(name: &str, settings: &Value) -> Result<Self, InfrastructureError> {
        let settings: SmsSettings = parse_settings(name, settings)?;
        settings.simulation.validate(name)?;
        Ok(Self::new(name, settings))
    }

    pub fn settings(&self) -> &SmsSettings {
        &self.settings
    }

    /// Messages accepted so far
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliveryChannel for SmsChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        identifier: &str,
        code: &str,
        options: &DeliveryOptions,
    ) -> Result<DeliveryReceipt, ChannelError> {
        if !is_valid_phone(identifier) {
            return Err(ChannelError::invalid_identifier(
                &self.name,
                format!("invalid phone number format: {}", mask_phone_number(identifier)),
            ));
        }

        self.settings.simulation.apply(&self.name).await?;

        let to = normalize_phone_number(identifier);
        let body = options.render(DEFAULT_TEMPLATE, code);
        let message_id = format!("sms_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            target: "otp_channels",
            channel = %self.name,
            provider = "sms",
            from = %self.settings.from_number,
            to = %mask_phone_number(&to),
            message_id = %message_id,
            message_length = body.len(),
            event = "sms_sent",
            "SMS sent (simulated)"
        );

        Ok(DeliveryReceipt::new(message_id, self.settings.cost_per_message))
    }
}
