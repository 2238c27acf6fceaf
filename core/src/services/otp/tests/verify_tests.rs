//! Unit tests for the verification state machine

use chrono::Duration;
use otp_shared::OtpSettings;

use crate::domain::entities::SessionState;
use crate::errors::VerifyError;
use crate::services::otp::{DeliveryOptions, GenerateResult};

use super::mocks::{names, start_time, Fixture};

async fn issue(fx: &Fixture) -> GenerateResult {
    fx.manager
        .generate_and_send("+15551234567", &names(&["sms"]), DeliveryOptions::default())
        .await
        .unwrap()
}

fn wrong_code(code: &str) -> String {
    // Same length, guaranteed different
    code.chars()
        .map(|c| if c == '1' { '2' } else { '1' })
        .collect()
}

#[tokio::test]
async fn test_verify_success_then_already_used() {
    let fx = Fixture::default();
    let issued = issue(&fx).await;

    fx.clock.advance(Duration::seconds(30));
    let success = fx.manager.verify(&issued.session_id, &issued.code).await.unwrap();
    assert_eq!(success.session_id, issued.session_id);
    assert_eq!(success.identifier, "+15551234567");
    assert_eq!(success.attempts_used, 1);
    assert_eq!(success.verified_at, start_time() + Duration::seconds(30));

    assert_eq!(
        fx.manager.verify(&issued.session_id, &issued.code).await,
        Err(VerifyError::AlreadyUsed)
    );

    // Verified sessions stay around, and the rejected reuse did not count
    let status = fx.manager.get_session_status(&issued.session_id).await.unwrap();
    assert_eq!(status.status, SessionState::Verified);
    assert_eq!(status.attempts, 1);
}

#[tokio::test]
async fn test_unknown_session() {
    let fx = Fixture::default();
    assert_eq!(
        fx.manager.verify("no-such-session", "123456").await,
        Err(VerifyError::InvalidSession)
    );
}

#[tokio::test]
async fn test_three_wrong_codes_then_exhausted() {
    let fx = Fixture::new(OtpSettings::new(6, 5.0, 3));
    let issued = issue(&fx).await;
    let wrong = wrong_code(&issued.code);

    for expected in [2, 1, 0] {
        assert_eq!(
            fx.manager.verify(&issued.session_id, &wrong).await,
            Err(VerifyError::InvalidCode {
                attempts_remaining: expected
            })
        );
    }

    // Even the right code is refused now, and the session is dropped
    assert_eq!(
        fx.manager.verify(&issued.session_id, &issued.code).await,
        Err(VerifyError::MaxAttemptsExceeded)
    );
    assert!(fx.manager.get_session_status(&issued.session_id).await.is_none());
    assert_eq!(
        fx.manager.verify(&issued.session_id, &issued.code).await,
        Err(VerifyError::InvalidSession)
    );
}

#[tokio::test]
async fn test_single_attempt_budget() {
    let fx = Fixture::new(OtpSettings::new(4, 5.0, 1));
    let issued = issue(&fx).await;
    assert_eq!(issued.code.len(), 4);

    assert_eq!(
        fx.manager.verify(&issued.session_id, &wrong_code(&issued.code)).await,
        Err(VerifyError::InvalidCode {
            attempts_remaining: 0
        })
    );

    let status = fx.manager.get_session_status(&issued.session_id).await.unwrap();
    assert_eq!(status.status, SessionState::MaxAttemptsExceeded);

    assert_eq!(
        fx.manager.verify(&issued.session_id, &issued.code).await,
        Err(VerifyError::MaxAttemptsExceeded)
    );
    assert!(fx.manager.get_session_status(&issued.session_id).await.is_none());
}

#[tokio::test]
async fn test_expiry_boundary() {
    let epsilon = Duration::milliseconds(1);

    let fx = Fixture::new(OtpSettings::new(6, 2.0, 3));
    let issued = issue(&fx).await;
    fx.clock.advance(Duration::minutes(2) - epsilon);
    assert!(fx.manager.verify(&issued.session_id, &issued.code).await.is_ok());

    let fx = Fixture::new(OtpSettings::new(6, 2.0, 3));
    let issued = issue(&fx).await;
    fx.clock.advance(Duration::minutes(2) + epsilon);
    assert_eq!(
        fx.manager.verify(&issued.session_id, &issued.code).await,
        Err(VerifyError::Expired)
    );

    // Expired sessions are discarded on contact
    assert!(fx.manager.get_session_status(&issued.session_id).await.is_none());
}

#[tokio::test]
async fn test_fractional_expiry_minutes() {
    let fx = Fixture::new(OtpSettings::new(6, 0.5, 3));
    let issued = issue(&fx).await;
    assert_eq!(issued.expires_at, start_time() + Duration::seconds(30));

    fx.clock.advance(Duration::seconds(31));
    assert_eq!(
        fx.manager.verify(&issued.session_id, &issued.code).await,
        Err(VerifyError::Expired)
    );
}

#[tokio::test]
async fn test_exhausted_takes_precedence_over_expired() {
    let fx = Fixture::new(OtpSettings::new(6, 5.0, 1));
    let issued = issue(&fx).await;

    let _ = fx.manager.verify(&issued.session_id, &wrong_code(&issued.code)).await;
    fx.clock.advance(Duration::minutes(10));

    assert_eq!(
        fx.manager.verify(&issued.session_id, &issued.code).await,
        Err(VerifyError::MaxAttemptsExceeded)
    );
}

#[tokio::test]
async fn test_wrong_length_candidate_counts_as_attempt() {
    let fx = Fixture::default();
    let issued = issue(&fx).await;

    assert_eq!(
        fx.manager.verify(&issued.session_id, "12").await,
        Err(VerifyError::InvalidCode {
            attempts_remaining: 2
        })
    );
    assert!(fx.manager.verify(&issued.session_id, &issued.code).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_wrong_codes_respect_budget() {
    let fx = Fixture::new(OtpSettings::new(6, 5.0, 3));
    let issued = issue(&fx).await;
    let wrong = wrong_code(&issued.code);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let manager = fx.manager.clone();
            let session_id = issued.session_id.clone();
            let wrong = wrong.clone();
            tokio::spawn(async move { manager.verify(&session_id, &wrong).await })
        })
        .collect();

    let mut invalid_code = 0;
    let mut exhausted = 0;
    let mut unknown = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Err(VerifyError::InvalidCode { .. }) => invalid_code += 1,
            Err(VerifyError::MaxAttemptsExceeded) => exhausted += 1,
            Err(VerifyError::InvalidSession) => unknown += 1,
            other => panic!("Unexpected verify outcome: {:?}", other),
        }
    }

    assert_eq!(invalid_code, 3);
    assert_eq!(exhausted, 1);
    assert_eq!(unknown, 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_correct_codes_verify_once() {
    let fx = Fixture::default();
    let issued = issue(&fx).await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let manager = fx.manager.clone();
            let session_id = issued.session_id.clone();
            let code = issued.code.clone();
            tokio::spawn(async move { manager.verify(&session_id, &code).await })
        })
        .collect();

    let mut verified = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => verified += 1,
            Err(err) => assert_eq!(err, VerifyError::AlreadyUsed),
        }
    }
    assert_eq!(verified, 1);
}
