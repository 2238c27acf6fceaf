//! Delivery channel configuration
//!
//! Each named channel carries a `kind` plus an opaque block of settings that
//! is handed unchanged to that channel's constructor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Configuration block for one named channel
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChannelConfig {
    /// Transport kind ("sms", "email", "push")
    pub kind: String,

    /// Disabled channels are not registered
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Channel-specific settings, passed through opaquely
    #[serde(default, flatten)]
    pub settings: Map<String, Value>,
}

impl ChannelConfig {
    /// Create an enabled channel of the given kind with no extra settings
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            enabled: true,
            settings: Map::new(),
        }
    }

    /// Add a setting to the opaque block
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// The opaque settings block as a JSON value
    pub fn settings_value(&self) -> Value {
        Value::Object(self.settings.clone())
    }
}

/// All configured channels keyed by the name callers use to request them
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ChannelsConfig(pub BTreeMap<String, ChannelConfig>);

impl Default for ChannelsConfig {
    fn default() -> Self {
        let mut channels = BTreeMap::new();
        channels.insert("sms".to_string(), ChannelConfig::new("sms"));
        channels.insert("email".to_string(), ChannelConfig::new("email"));
        channels.insert("push".to_string(), ChannelConfig::new("push"));
        Self(channels)
    }
}

impl ChannelsConfig {
    /// Iterate over enabled channels
    pub fn enabled(&self) -> impl Iterator<Item = (&String, &ChannelConfig)> {
        self.0.iter().filter(|(_, config)| config.enabled)
    }

    /// Look up a channel block by name
    pub fn get(&self, name: &str) -> Option<&ChannelConfig> {
        self.0.get(name)
    }
}

fn default_enabled() -> bool {
    true
}
