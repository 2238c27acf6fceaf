//! Per-channel delivery outcome

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ChannelError;

/// Outcome of delivering a code through one named channel
///
/// Generate and resend return one of these per requested channel, in request
/// order, and append them to the session's delivery history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDeliveryResult {
    /// Channel name as requested by the caller
    pub channel: String,

    /// Whether the provider accepted the message
    pub success: bool,

    /// Provider-side correlation id for accepted messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,

    /// Cost charged for this delivery (zero on failure)
    pub cost: f64,

    /// Failure description for rejected deliveries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the delivery was attempted
    pub attempted_at: DateTime<Utc>,
}

impl ChannelDeliveryResult {
    /// Successful delivery with the provider's id and cost
    pub fn delivered(
        channel: impl Into<String>,
        delivery_id: impl Into<String>,
        cost: f64,
        attempted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            channel: channel.into(),
            success: true,
            delivery_id: Some(delivery_id.into()),
            cost,
            error: None,
            attempted_at,
        }
    }

    /// Failed delivery carrying the channel's error
    pub fn failed(
        channel: impl Into<String>,
        error: &ChannelError,
        attempted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            channel: channel.into(),
            success: false,
            delivery_id: None,
            cost: 0.0,
            error: Some(error.to_string()),
            attempted_at,
        }
    }

    /// Sum the cost of a batch of deliveries
    pub fn total_cost(results: &[ChannelDeliveryResult]) -> f64 {
        results.iter().map(|r| r.cost).sum()
    }

    /// True if any delivery in the batch succeeded
    pub fn any_succeeded(results: &[ChannelDeliveryResult]) -> bool {
        results.iter().any(|r| r.success)
    }
}

/// Caller-supplied hints forwarded unchanged to every channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOptions {
    /// Subject line for channels that have one (email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Message template; `{code}` and `{minutes}` are substituted by channels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Expiry shown to the recipient; filled in by the manager when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_minutes: Option<f64>,

    /// Free-form provider metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl DeliveryOptions {
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Render the message body, falling back to `default_template`
    pub fn render(&self, default_template: &str, code: &str) -> String {
        let minutes = self
            .expiry_minutes
            .map(|m| format!("{}", m))
            .unwrap_or_else(|| "a few".to_string());
        self.template
            .as_deref()
            .unwrap_or(default_template)
            .replace("{code}", code)
            .replace("{minutes}", &minutes)
    }
}
