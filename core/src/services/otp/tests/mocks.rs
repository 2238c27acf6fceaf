//! Mock channels and fixtures for testing the OTP manager

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use otp_shared::OtpSettings;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::ChannelError;
use crate::services::clock::ManualClock;
use crate::services::otp::{
    ChannelRegistry, DeliveryChannel, DeliveryOptions, DeliveryReceipt, OtpManager,
};

// Mock channel that records every message it is asked to deliver
pub struct MockChannel {
    pub name: String,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub options_seen: Arc<Mutex<Vec<DeliveryOptions>>>,
    pub should_fail: bool,
    pub cost: f64,
    pub delay: Option<Duration>,
}

impl MockChannel {
    pub fn new(name: &str, cost: f64) -> Self {
        Self {
            name: name.to_string(),
            sent: Arc::new(Mutex::new(Vec::new())),
            options_seen: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
            cost,
            delay: None,
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            should_fail: true,
            ..Self::new(name, 0.0)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent_codes(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, code)| code.clone())
            .collect()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryChannel for MockChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        identifier: &str,
        code: &str,
        options: &DeliveryOptions,
    ) -> Result<DeliveryReceipt, ChannelError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.options_seen.lock().unwrap().push(options.clone());
        if self.should_fail {
            return Err(ChannelError::delivery_failed(&self.name, "mock provider error"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((identifier.to_string(), code.to_string()));
        Ok(DeliveryReceipt::new(
            format!("mock-{}-{}", self.name, uuid::Uuid::new_v4()),
            self.cost,
        ))
    }
}

// Channel whose send panics
pub struct PanickingChannel;

#[async_trait]
impl DeliveryChannel for PanickingChannel {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn send(
        &self,
        _identifier: &str,
        _code: &str,
        _options: &DeliveryOptions,
    ) -> Result<DeliveryReceipt, ChannelError> {
        panic!("provider SDK blew up");
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Manager with `sms` and `email` mocks on a manual clock
pub struct Fixture {
    pub manager: Arc<OtpManager>,
    pub clock: Arc<ManualClock>,
    pub sms: Arc<MockChannel>,
    pub email: Arc<MockChannel>,
}

impl Fixture {
    pub fn new(settings: OtpSettings) -> Self {
        Self::with_channels(
            settings,
            Arc::new(MockChannel::new("sms", 0.0075)),
            Arc::new(MockChannel::new("email", 0.0001)),
        )
    }

    pub fn with_channels(
        settings: OtpSettings,
        sms: Arc<MockChannel>,
        email: Arc<MockChannel>,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(start_time()));
        let registry = ChannelRegistry::new()
            .with_channel("sms", sms.clone())
            .with_channel("email", email.clone());
        let manager = OtpManager::with_clock(settings, registry, clock.clone()).unwrap();
        Self {
            manager: Arc::new(manager),
            clock,
            sms,
            email,
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new(OtpSettings::default())
    }
}
