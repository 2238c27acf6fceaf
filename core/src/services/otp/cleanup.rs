//! Periodic sweep of expired OTP sessions
//!
//! Verification already discards expired sessions it touches; this sweep
//! catches the ones nobody came back for.

use otp_shared::CleanupConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::manager::OtpManager;

/// Service for removing expired, unverified sessions
pub struct OtpCleanupService {
    manager: Arc<OtpManager>,
    config: CleanupConfig,
}

impl OtpCleanupService {
    pub fn new(manager: Arc<OtpManager>, config: CleanupConfig) -> Self {
        Self { manager, config }
    }

    /// Run a single cleanup cycle
    pub async fn run_cleanup(&self) -> CleanupResult {
        if !self.config.enabled {
            return CleanupResult::default();
        }

        debug!("Starting OTP cleanup cycle");

        let result = CleanupResult {
            expired_sessions_removed: self.manager.cleanup_expired_sessions().await,
        };

        debug!(
            removed = result.expired_sessions_removed,
            event = "otp_cleanup_cycle",
            "OTP cleanup completed"
        );

        result
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` without spawning when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("OTP cleanup service is disabled");
            return None;
        }

        let period = Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "OTP cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(period);

            loop {
                interval_timer.tick().await;
                self.run_cleanup().await;
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired sessions removed
    pub expired_sessions_removed: usize,
}

impl CleanupResult {
    pub fn total_cleaned(&self) -> usize {
        self.expired_sessions_removed
    }
}
