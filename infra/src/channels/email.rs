//! Simulated email transport

use async_trait::async_trait;
use otp_core::errors::ChannelError;
use otp_core::services::otp::{DeliveryChannel, DeliveryOptions, DeliveryReceipt};
use otp_shared::identifier::{is_valid_email, mask_email};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use uuid::Uuid;

use super::simulation::{parse_settings, SimulationSettings};
use crate::InfrastructureError;

const DEFAULT_TEMPLATE: &str =
    "Your verification code is {code}.\n\nThis code expires in {minutes} minutes. \
     If you did not request it, you can ignore this email.";

/// Email channel settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmailSettings {
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Subject used when the caller supplies none
    #[serde(default = "default_subject")]
    pub default_subject: String,

    #[serde(default = "default_cost")]
    pub cost_per_message: f64,

    #[serde(default, flatten)]
    pub simulation: SimulationSettings,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            from_address: default_from_address(),
            default_subject: default_subject(),
            cost_per_message: default_cost(),
            simulation: SimulationSettings::default(),
        }
    }
}

fn default_from_address() -> String {
    "no-reply@otprelay.local".to_string()
}

fn default_subject() -> String {
    "Your verification code".to_string()
}

fn default_cost() -> f64 {
    0.0001
}

/// Email channel with address validation
pub struct EmailChannel {
    name: String,
    settings: EmailSettings,
    message_count: AtomicU64,
}

impl EmailChannel {
    pub fn new(name: impl Into<String>, settings: EmailSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            message_count: AtomicU64::new(0),
        }
    }

    pub fn from_config(name: &str, settings: &Value) -> Result<Self, InfrastructureError> {
        let settings: EmailSettings = parse_settings(name, settings)?;
        settings.simulation.validate(name)?;
        Ok(Self::new(name, settings))
    }

    pub fn settings(&self) -> &EmailSettings {
        &self.settings
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Subject for a message, preferring the caller's
    pub fn subject_for<'a>(&'a self, options: &'a DeliveryOptions) -> &'a str {
        options
            .subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.settings.default_subject)
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        identifier: &str,
        code: &str,
        options: &DeliveryOptions,
    ) -> Result<DeliveryReceipt, ChannelError> {
        if !is_valid_email(identifier) {
            return Err(ChannelError::invalid_identifier(
                &self.name,
                format!("invalid email address: {}", mask_email(identifier)),
            ));
        }

        self.settings.simulation.apply(&self.name).await?;

        let subject = self.subject_for(options);
        let body = options.render(DEFAULT_TEMPLATE, code);
        let message_id = format!("email_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            target: "otp_channels",
            channel = %self.name,
            provider = "email",
            from = %self.settings.from_address,
            to = %mask_email(identifier),
            subject = %subject,
            message_id = %message_id,
            message_length = body.len(),
            event = "email_sent",
            "Email sent (simulated)"
        );

        Ok(DeliveryReceipt::new(message_id, self.settings.cost_per_message))
    }
}
