//! Failover delivery channel
//!
//! Wraps a primary and a backup channel. After the primary fails, deliveries
//! go straight to the backup until the cool-down elapses, then the primary
//! is tried again.

use async_trait::async_trait;
use otp_core::errors::ChannelError;
use otp_core::services::otp::{DeliveryChannel, DeliveryOptions, DeliveryReceipt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Failover settings as they appear in a channel block
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FailoverSettings {
    /// Name of the primary channel
    pub primary: String,

    /// Name of the backup channel
    pub backup: String,

    /// How long to stay on the backup after a primary failure (in seconds)
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u64,
}

fn default_cooldown() -> u64 {
    30
}

/// State tracking for failover
#[derive(Debug, Clone, Default)]
struct FailoverState {
    /// Whether we're currently using the backup channel
    using_backup: bool,
    /// When the primary channel last failed
    last_primary_failure: Option<Instant>,
    /// Number of consecutive failures on primary
    primary_failure_count: u32,
}

/// Channel with automatic failover from primary to backup
pub struct FailoverChannel {
    name: String,
    primary: Arc<dyn DeliveryChannel>,
    backup: Arc<dyn DeliveryChannel>,
    state: RwLock<FailoverState>,
    cooldown: Duration,
}

impl FailoverChannel {
    pub fn new(
        name: impl Into<String>,
        primary: Arc<dyn DeliveryChannel>,
        backup: Arc<dyn DeliveryChannel>,
        cooldown: Duration,
    ) -> Self {
        let name = name.into();
        info!(
            channel = %name,
            primary = primary.name(),
            backup = backup.name(),
            "Initializing failover channel"
        );

        Self {
            name,
            primary,
            backup,
            state: RwLock::new(FailoverState::default()),
            cooldown,
        }
    }

    /// Whether deliveries are currently routed to the backup
    pub async fn is_using_backup(&self) -> bool {
        self.state.read().await.using_backup
    }

    pub async fn primary_failure_count(&self) -> u32 {
        self.state.read().await.primary_failure_count
    }

    async fn should_try_primary(&self) -> bool {
        let state = self.state.read().await;

        if !state.using_backup {
            return true;
        }

        match state.last_primary_failure {
            Some(last_failure) => last_failure.elapsed() >= self.cooldown,
            None => true,
        }
    }

    async fn record_primary_failure(&self) {
        let mut state = self.state.write().await;

        state.primary_failure_count += 1;
        state.last_primary_failure = Some(Instant::now());

        if !state.using_backup {
            warn!(
                channel = %self.name,
                primary = self.primary.name(),
                backup = self.backup.name(),
                event = "channel_failover",
                "Primary channel failed, switching to backup"
            );
            state.using_backup = true;
        }
    }

    async fn record_primary_success(&self) {
        let mut state = self.state.write().await;

        if state.using_backup {
            info!(
                channel = %self.name,
                primary = self.primary.name(),
                event = "channel_recovered",
                "Primary channel recovered, switching back from backup"
            );
        }

        *state = FailoverState::default();
    }
}

#[async_trait]
impl DeliveryChannel for FailoverChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        identifier: &str,
        code: &str,
        options: &DeliveryOptions,
    ) -> Result<DeliveryReceipt, ChannelError> {
        let primary_error = if self.should_try_primary().await {
            match self.primary.send(identifier, code, options).await {
                Ok(receipt) => {
                    self.record_primary_success().await;
                    return Ok(receipt);
                }
                // A bad identifier fails on every transport of the same kind
                Err(err @ ChannelError::InvalidIdentifier { .. }) => return Err(err),
                Err(err) => {
                    error!(
                        channel = %self.name,
                        primary = self.primary.name(),
                        error = %err,
                        "Primary channel failed"
                    );
                    self.record_primary_failure().await;
                    Some(err)
                }
            }
        } else {
            None
        };

        match self.backup.send(identifier, code, options).await {
            Ok(receipt) => Ok(receipt),
            Err(backup_error) => {
                error!(
                    channel = %self.name,
                    backup = self.backup.name(),
                    error = %backup_error,
                    "Backup channel also failed"
                );
                let reason = match primary_error {
                    Some(primary_error) => format!(
                        "primary and backup failed (primary: {}; backup: {})",
                        primary_error, backup_error
                    ),
                    None => format!("backup failed while primary cools down: {}", backup_error),
                };
                Err(ChannelError::delivery_failed(&self.name, reason))
            }
        }
    }
}
