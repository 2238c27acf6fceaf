//! Integration tests for the OTP lifecycle through the public API

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::{Arc, Mutex};

    use otp_core::errors::{ChannelError, VerifyError};
    use otp_core::services::clock::ManualClock;
    use otp_core::services::otp::{
        ChannelRegistry, DeliveryChannel, DeliveryOptions, DeliveryReceipt, OtpCleanupService,
        OtpManager,
    };
    use otp_shared::{CleanupConfig, OtpSettings};

    // Channel that keeps an inbox per identifier
    #[derive(Default)]
    struct InboxChannel {
        inbox: Mutex<Vec<(String, String)>>,
    }

    impl InboxChannel {
        fn last_code_for(&self, identifier: &str) -> Option<String> {
            self.inbox
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(to, _)| to == identifier)
                .map(|(_, code)| code.clone())
        }
    }

    #[async_trait]
    impl DeliveryChannel for InboxChannel {
        fn name(&self) -> &str {
            "inbox"
        }

        async fn send(
            &self,
            identifier: &str,
            code: &str,
            _options: &DeliveryOptions,
        ) -> Result<DeliveryReceipt, ChannelError> {
            self.inbox
                .lock()
                .unwrap()
                .push((identifier.to_string(), code.to_string()));
            Ok(DeliveryReceipt::new(receipt_id(identifier), 0.001))
        }
    }

    struct RejectingChannel;

    #[async_trait]
    impl DeliveryChannel for RejectingChannel {
        fn name(&self) -> &str {
            "rejecting"
        }

        async fn send(
            &self,
            _identifier: &str,
            _code: &str,
            _options: &DeliveryOptions,
        ) -> Result<DeliveryReceipt, ChannelError> {
            Err(ChannelError::invalid_identifier(
                "rejecting",
                "not a phone number",
            ))
        }
    }

    fn receipt_id(identifier: &str) -> String {
        format!("inbox-{}", identifier.len())
    }

    fn setup(settings: OtpSettings) -> (Arc<OtpManager>, Arc<ManualClock>, Arc<InboxChannel>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let inbox = Arc::new(InboxChannel::default());
        let registry = ChannelRegistry::new()
            .with_channel("email", inbox.clone())
            .with_channel("sms", Arc::new(RejectingChannel));
        let manager = OtpManager::with_clock(settings, registry, clock.clone()).unwrap();
        (Arc::new(manager), clock, inbox)
    }

    fn channels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_full_login_flow() {
        let (manager, clock, inbox) = setup(OtpSettings::default());

        let sent = manager
            .generate_and_send("u@x.com", &channels(&["sms", "email"]), DeliveryOptions::default())
            .await
            .unwrap();
        assert!(sent.success);
        assert_eq!(sent.channels.len(), 2);
        assert!(!sent.channels[0].success);
        assert!(sent.channels[1].success);

        // User reads the code from their inbox a minute later
        clock.advance(Duration::minutes(1));
        let code = inbox.last_code_for("u@x.com").unwrap();
        assert_eq!(code, sent.code);

        let verified = manager.verify(&sent.session_id, &code).await.unwrap();
        assert_eq!(verified.identifier, "u@x.com");
        assert_eq!(verified.attempts_used, 1);

        assert_eq!(
            manager.verify(&sent.session_id, &code).await,
            Err(VerifyError::AlreadyUsed)
        );
    }

    #[tokio::test]
    async fn test_resend_then_verify() {
        let (manager, clock, inbox) = setup(OtpSettings::default());

        let sent = manager
            .generate_and_send("u@x.com", &channels(&["email"]), DeliveryOptions::default())
            .await
            .unwrap();

        clock.advance(Duration::minutes(2));
        manager.resend(&sent.session_id, None).await.unwrap();
        assert_eq!(inbox.inbox.lock().unwrap().len(), 2);
        assert_eq!(inbox.last_code_for("u@x.com").unwrap(), sent.code);

        // Resend does not extend the expiry
        clock.advance(Duration::minutes(4));
        assert_eq!(
            manager.verify(&sent.session_id, &sent.code).await,
            Err(VerifyError::Expired)
        );
    }

    #[tokio::test]
    async fn test_abandoned_sessions_are_swept() {
        let (manager, clock, _inbox) = setup(OtpSettings::new(6, 1.0, 3));
        let cleanup = OtpCleanupService::new(manager.clone(), CleanupConfig::default());

        for user in ["a@x.com", "b@x.com", "c@x.com"] {
            manager
                .generate_and_send(user, &channels(&["email"]), DeliveryOptions::default())
                .await
                .unwrap();
        }
        assert_eq!(cleanup.run_cleanup().await.expired_sessions_removed, 0);

        clock.advance(Duration::minutes(2));
        assert_eq!(cleanup.run_cleanup().await.expired_sessions_removed, 3);
        assert_eq!(manager.get_stats().await.total_sessions, 0);
    }
}
