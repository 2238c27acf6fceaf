//! Integration tests wiring configured channels into the OTP manager

use otp_core::errors::VerifyError;
use otp_core::services::otp::{DeliveryOptions, OtpManager};
use otp_infra::build_channel_registry;
use otp_shared::{ChannelConfig, ChannelsConfig, OtpSettings};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("otp_core=debug,otp_infra=debug")
        .try_init();
}

fn channels(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn manager(config: &ChannelsConfig) -> Arc<OtpManager> {
    let registry = build_channel_registry(config).expect("registry builds");
    Arc::new(OtpManager::new(OtpSettings::default(), registry).expect("valid settings"))
}

#[tokio::test]
async fn test_email_identifier_over_sms_and_email() {
    init_tracing();
    let manager = manager(&ChannelsConfig::default());

    let result = manager
        .generate_and_send("u@x.com", &channels(&["sms", "email"]), DeliveryOptions::default())
        .await
        .unwrap();

    // SMS rejects the address, email delivers it
    assert!(result.success);
    assert_eq!(result.channels.len(), 2);
    assert!(!result.channels[0].success);
    assert!(result.channels[1].success);
    assert!((result.total_cost - 0.0001).abs() < 1e-12);

    let verified = manager.verify(&result.session_id, &result.code).await.unwrap();
    assert_eq!(verified.identifier, "u@x.com");
}

#[tokio::test]
async fn test_failover_channel_behind_manager() {
    init_tracing();
    let mut config = ChannelsConfig::default();
    config.0.insert(
        "sms_flaky".to_string(),
        ChannelConfig::new("sms").with_setting("simulate_failure", true),
    );
    config.0.insert(
        "sms_reliable".to_string(),
        ChannelConfig::new("sms").with_setting("cost_per_message", 0.01),
    );
    config.0.insert(
        "sms_failover".to_string(),
        ChannelConfig::new("failover")
            .with_setting("primary", "sms_flaky")
            .with_setting("backup", "sms_reliable"),
    );
    let manager = manager(&config);

    let result = manager
        .generate_and_send(
            "+15551234567",
            &channels(&["sms_failover"]),
            DeliveryOptions::default(),
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.channels[0].channel, "sms_failover");
    assert!((result.total_cost - 0.01).abs() < 1e-12);
}

#[tokio::test]
async fn test_every_channel_failing() {
    init_tracing();
    let mut config = ChannelsConfig::default();
    for name in ["sms", "email", "push"] {
        let block = config.0.get_mut(name).unwrap();
        block.settings.insert("simulate_failure".to_string(), true.into());
    }
    let manager = manager(&config);

    let result = manager
        .generate_and_send("u@x.com", &channels(&["email", "push"]), DeliveryOptions::default())
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.total_cost, 0.0);

    // The session still exists and enforces its attempt budget
    assert_eq!(
        manager.verify(&result.session_id, "not-the-code").await,
        Err(VerifyError::InvalidCode {
            attempts_remaining: 2
        })
    );
}
