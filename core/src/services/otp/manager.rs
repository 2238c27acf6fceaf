//! OTP session manager: generation, dispatch, verification and resend

use futures_util::future::join_all;
use futures_util::FutureExt;
use otp_shared::identifier::mask_identifier;
use otp_shared::OtpSettings;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::domain::entities::OtpSession;
use crate::domain::value_objects::{ChannelDeliveryResult, DeliveryOptions};
use crate::errors::{ChannelError, OtpError, OtpResult, ResendError, VerifyError};
use crate::services::clock::{Clock, SystemClock};

use super::channel::ChannelRegistry;
use super::generator::{new_correlation_id, CodeGenerator};
use super::store::SessionStore;
use super::types::{GenerateResult, OtpStats, ResendResult, SessionStatusView, VerifySuccess};

/// Owns the session store and orchestrates the OTP lifecycle
pub struct OtpManager {
    /// Validated lifecycle settings
    settings: OtpSettings,
    /// Secure code source
    generator: CodeGenerator,
    /// Name-to-channel lookup
    channels: ChannelRegistry,
    /// Live sessions
    store: SessionStore,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
}

impl OtpManager {
    /// Create a manager on the system clock
    ///
    /// # Returns
    ///
    /// * `Err(OtpError::Configuration)` - If the settings are out of range
    pub fn new(settings: OtpSettings, channels: ChannelRegistry) -> OtpResult<Self> {
        Self::with_clock(settings, channels, Arc::new(SystemClock))
    }

    /// Create a manager with an injected clock
    pub fn with_clock(
        settings: OtpSettings,
        channels: ChannelRegistry,
        clock: Arc<dyn Clock>,
    ) -> OtpResult<Self> {
        settings.validate()?;
        let generator = CodeGenerator::from_settings(&settings)?;

        Ok(Self {
            settings,
            generator,
            channels,
            store: SessionStore::new(),
            clock,
        })
    }

    pub fn settings(&self) -> &OtpSettings {
        &self.settings
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels.names()
    }

    /// Create a session and deliver its code on every requested channel
    ///
    /// Channels run concurrently. Unknown names and channel errors become
    /// failed entries in the result; they never fail the call. The session is
    /// kept even when every channel fails.
    ///
    /// # Returns
    ///
    /// * `Ok(GenerateResult)` - Session id, plaintext code and per-channel outcomes
    /// * `Err(OtpError::Validation)` - Empty identifier or no channels requested
    pub async fn generate_and_send(
        &self,
        identifier: &str,
        channels: &[String],
        options: DeliveryOptions,
    ) -> OtpResult<GenerateResult> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(OtpError::validation("identifier must not be empty"));
        }

        let channels = dedup_channels(channels);
        if channels.is_empty() {
            return Err(OtpError::validation("at least one channel is required"));
        }

        let now = self.clock.now();
        let generated = self
            .generator
            .generate_with_expiry(now, self.settings.expiry_window())?;
        let session_id = new_correlation_id();

        let mut options = options;
        options.expiry_minutes.get_or_insert(self.settings.expiry_minutes);

        let session = OtpSession::new(
            session_id.clone(),
            identifier.to_string(),
            generated.code.clone(),
            channels.clone(),
            now,
            generated.expires_at,
            self.settings.max_attempts,
        )
        .with_options(options.clone());
        self.store.insert(session).await;

        tracing::info!(
            session_id = %session_id,
            identifier = %mask_identifier(identifier),
            channels = ?channels,
            expires_at = %generated.expires_at,
            event = "otp_generated",
            "OTP session created"
        );

        let results = self
            .deliver(identifier, &generated.code, &channels, &options)
            .await;

        self.append_history(&session_id, &results).await;

        let success = ChannelDeliveryResult::any_succeeded(&results);
        let total_cost = ChannelDeliveryResult::total_cost(&results);

        if success {
            tracing::info!(
                session_id = %session_id,
                delivered = results.iter().filter(|r| r.success).count(),
                requested = results.len(),
                total_cost = total_cost,
                event = "otp_dispatched",
                "OTP delivered"
            );
        } else {
            tracing::warn!(
                session_id = %session_id,
                requested = results.len(),
                event = "otp_dispatch_failed",
                "OTP delivery failed on every channel"
            );
        }

        Ok(GenerateResult {
            session_id,
            code: generated.code,
            expires_at: generated.expires_at,
            channels: results,
            total_cost,
            success,
        })
    }

    /// Check a candidate code against a session
    ///
    /// The lookup, attempt increment and comparison run under the store's
    /// write lock, so concurrent calls on one session are serialized and the
    /// attempt budget holds. Sessions found expired or exhausted are deleted.
    pub async fn verify(
        &self,
        session_id: &str,
        candidate: &str,
    ) -> Result<VerifySuccess, VerifyError> {
        let now = self.clock.now();
        let mut sessions = self.store.write().await;

        let Some(session) = sessions.get_mut(session_id) else {
            tracing::warn!(
                session_id = %session_id,
                event = "otp_verify_unknown_session",
                "Verification attempted for unknown session"
            );
            return Err(VerifyError::InvalidSession);
        };

        let outcome = session.verify(candidate, now);
        let identifier = session.identifier.clone();

        match outcome {
            Ok(attempts_used) => {
                tracing::info!(
                    session_id = %session_id,
                    identifier = %mask_identifier(&identifier),
                    attempts_used = attempts_used,
                    event = "otp_verified",
                    "OTP verified"
                );
                Ok(VerifySuccess {
                    session_id: session_id.to_string(),
                    identifier,
                    attempts_used,
                    verified_at: now,
                })
            }
            Err(err @ (VerifyError::MaxAttemptsExceeded | VerifyError::Expired)) => {
                sessions.remove(session_id);
                tracing::warn!(
                    session_id = %session_id,
                    identifier = %mask_identifier(&identifier),
                    reason = %err,
                    event = "otp_session_discarded",
                    "OTP session discarded during verification"
                );
                Err(err)
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %session_id,
                    identifier = %mask_identifier(&identifier),
                    error_code = err.code(),
                    event = "otp_verify_failed",
                    "OTP verification failed"
                );
                Err(err)
            }
        }
    }

    /// Redeliver a session's existing code
    ///
    /// Uses `channels` when given and non-empty, otherwise the channels the
    /// session was created with. Attempts are not touched.
    pub async fn resend(
        &self,
        session_id: &str,
        channels: Option<&[String]>,
    ) -> Result<ResendResult, ResendError> {
        let now = self.clock.now();

        let (identifier, code, targets, options) = {
            let sessions = self.store.read().await;
            let session = sessions.get(session_id).ok_or(ResendError::SessionNotFound)?;
            if session.verified {
                return Err(ResendError::AlreadyVerified);
            }
            if session.is_expired(now) {
                return Err(ResendError::SessionExpired);
            }

            let targets = match channels {
                Some(requested) if !requested.is_empty() => dedup_channels(requested),
                _ => session.channels.clone(),
            };
            (
                session.identifier.clone(),
                session.code().to_string(),
                targets,
                session.options.clone(),
            )
        };

        let results = self.deliver(&identifier, &code, &targets, &options).await;
        self.append_history(session_id, &results).await;

        let success = ChannelDeliveryResult::any_succeeded(&results);
        let total_cost = ChannelDeliveryResult::total_cost(&results);

        tracing::info!(
            session_id = %session_id,
            identifier = %mask_identifier(&identifier),
            channels = ?targets,
            success = success,
            event = "otp_resent",
            "OTP resent"
        );

        Ok(ResendResult {
            session_id: session_id.to_string(),
            channels: results,
            total_cost,
            success,
        })
    }

    /// Read-only view of a session, or `None` if it does not exist
    pub async fn get_session_status(&self, session_id: &str) -> Option<SessionStatusView> {
        let now = self.clock.now();
        let sessions = self.store.read().await;
        sessions
            .get(session_id)
            .map(|session| SessionStatusView::from_session(session, now))
    }

    /// Remove every unverified session past its expiry
    ///
    /// Verified sessions are kept regardless of age.
    pub async fn cleanup_expired_sessions(&self) -> usize {
        let removed = self.store.remove_stale(self.clock.now()).await;
        if removed > 0 {
            tracing::info!(
                removed = removed,
                event = "otp_sessions_cleaned",
                "Expired OTP sessions removed"
            );
        }
        removed
    }

    /// Counts of active, expired and verified sessions
    pub async fn get_stats(&self) -> OtpStats {
        let now = self.clock.now();
        let sessions = self.store.read().await;

        let mut stats = OtpStats {
            total_sessions: sessions.len(),
            active_sessions: 0,
            expired_sessions: 0,
            verified_sessions: 0,
            channels: self.channels.names(),
            config: self.settings.clone(),
        };

        for session in sessions.values() {
            if session.verified {
                stats.verified_sessions += 1;
            } else if session.is_expired(now) {
                stats.expired_sessions += 1;
            } else {
                stats.active_sessions += 1;
            }
        }

        stats
    }

    async fn append_history(&self, session_id: &str, results: &[ChannelDeliveryResult]) {
        let mut sessions = self.store.write().await;
        // The session may have been verified-and-discarded or swept meanwhile
        if let Some(session) = sessions.get_mut(session_id) {
            session.record_deliveries(results);
        }
    }

    /// Fan out to every channel concurrently; results keep request order
    async fn deliver(
        &self,
        identifier: &str,
        code: &str,
        channels: &[String],
        options: &DeliveryOptions,
    ) -> Vec<ChannelDeliveryResult> {
        join_all(
            channels
                .iter()
                .map(|name| self.deliver_one(name, identifier, code, options)),
        )
        .await
    }

    async fn deliver_one(
        &self,
        name: &str,
        identifier: &str,
        code: &str,
        options: &DeliveryOptions,
    ) -> ChannelDeliveryResult {
        let attempted_at = self.clock.now();

        let Some(channel) = self.channels.get(name) else {
            let err = ChannelError::UnsupportedChannel {
                channel: name.to_string(),
            };
            tracing::warn!(
                channel = %name,
                event = "otp_channel_unknown",
                "Requested channel is not configured"
            );
            return ChannelDeliveryResult::failed(name, &err, attempted_at);
        };

        let outcome = AssertUnwindSafe(channel.send(identifier, code, options))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                Err(ChannelError::delivery_failed(
                    name,
                    "channel panicked during delivery",
                ))
            });

        match outcome {
            Ok(receipt) => {
                tracing::debug!(
                    channel = %name,
                    delivery_id = %receipt.delivery_id,
                    cost = receipt.cost,
                    event = "otp_channel_delivered",
                    "Channel accepted OTP"
                );
                ChannelDeliveryResult::delivered(
                    name,
                    receipt.delivery_id,
                    receipt.cost,
                    attempted_at,
                )
            }
            Err(err) => {
                tracing::warn!(
                    channel = %name,
                    identifier = %mask_identifier(identifier),
                    error = %err,
                    event = "otp_channel_failed",
                    "Channel failed to deliver OTP"
                );
                ChannelDeliveryResult::failed(name, &err, attempted_at)
            }
        }
    }
}

/// Trim names, drop blanks and repeats, keep first-seen order
fn dedup_channels(channels: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(channels.len());
    for name in channels {
        let name = name.trim();
        if !name.is_empty() && !unique.iter().any(|seen| seen == name) {
            unique.push(name.to_string());
        }
    }
    unique
}
