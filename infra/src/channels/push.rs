//! Simulated push notification transport

use async_trait::async_trait;
use otp_core::errors::ChannelError;
use otp_core::services::otp::{DeliveryChannel, DeliveryOptions, DeliveryReceipt};
use otp_shared::identifier::{is_valid_device_token, mask_identifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use uuid::Uuid;

use super::simulation::{parse_settings, SimulationSettings};
use crate::InfrastructureError;

const DEFAULT_TEMPLATE: &str = "Your verification code is {code}";

/// Push channel settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PushSettings {
    /// Application id reported to the push provider
    #[serde(default)]
    pub app_id: Option<String>,

    #[serde(default)]
    pub cost_per_message: f64,

    #[serde(default, flatten)]
    pub simulation: SimulationSettings,
}

/// Push channel keyed by device token
pub struct PushChannel {
    name: String,
    settings: PushSettings,
    message_count: AtomicU64,
}

impl PushChannel {
    pub fn new(name: impl Into<String>, settings: PushSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            message_count: AtomicU64::new(0),
        }
    }

    pub fn from_config(name: &str, settings: &Value) -> Result<Self, InfrastructureError> {
        let settings: PushSettings = parse_settings(name, settings)?;
        settings.simulation.validate(name)?;
        Ok(Self::new(name, settings))
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliveryChannel for PushChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        identifier: &str,
        code: &str,
        options: &DeliveryOptions,
    ) -> Result<DeliveryReceipt, ChannelError> {
        if !is_valid_device_token(identifier) {
            return Err(ChannelError::invalid_identifier(
                &self.name,
                "device token is empty or malformed",
            ));
        }

        self.settings.simulation.apply(&self.name).await?;

        let body = options.render(DEFAULT_TEMPLATE, code);
        let message_id = format!("push_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            target: "otp_channels",
            channel = %self.name,
            provider = "push",
            app_id = ?self.settings.app_id,
            device = %mask_identifier(identifier),
            message_id = %message_id,
            message_length = body.len(),
            event = "push_sent",
            "Push notification sent (simulated)"
        );

        Ok(DeliveryReceipt::new(message_id, self.settings.cost_per_message))
    }
}
