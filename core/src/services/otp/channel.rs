//! Delivery channel capability and the name-to-channel registry

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use crate::domain::value_objects::DeliveryOptions;
use crate::errors::ChannelError;

/// Provider acknowledgement for an accepted message
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceipt {
    pub delivery_id: String,
    pub cost: f64,
}

impl DeliveryReceipt {
    pub fn new(delivery_id: impl Into<String>, cost: f64) -> Self {
        Self {
            delivery_id: delivery_id.into(),
            cost,
        }
    }
}

/// Trait for delivery channel integration
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Transport name used in logs
    fn name(&self) -> &str;

    /// Deliver `code` to `identifier`
    async fn send(
        &self,
        identifier: &str,
        code: &str,
        options: &DeliveryOptions,
    ) -> Result<DeliveryReceipt, ChannelError>;
}

/// Channels keyed by the name callers request them by
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    channels: BTreeMap<String, Arc<dyn DeliveryChannel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, channel: Arc<dyn DeliveryChannel>) {
        self.channels.insert(name.into(), channel);
    }

    pub fn with_channel(
        mut self,
        name: impl Into<String>,
        channel: Arc<dyn DeliveryChannel>,
    ) -> Self {
        self.register(name, channel);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DeliveryChannel>> {
        self.channels.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .finish()
    }
}
