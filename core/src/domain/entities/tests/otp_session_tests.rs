//! Unit tests for the OTP session entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::otp_session::{OtpSession, SessionState};
use crate::errors::VerifyError;

fn session(max_attempts: u32) -> OtpSession {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    OtpSession::new(
        "session-1".to_string(),
        "user@example.com".to_string(),
        "123456".to_string(),
        vec!["sms".to_string()],
        created_at,
        created_at + Duration::minutes(5),
        max_attempts,
    )
}

#[test]
fn test_new_session_is_pending() {
    let s = session(3);
    assert_eq!(s.attempts, 0);
    assert!(!s.verified);
    assert!(s.verified_at.is_none());
    assert!(s.deliveries.is_empty());
    assert_eq!(s.attempts_remaining(), 3);
    assert_eq!(s.state(s.created_at), SessionState::Pending);
    assert!(s.is_active(s.created_at));
}

#[test]
fn test_correct_code_verifies_once() {
    let mut s = session(3);
    let now = s.created_at + Duration::seconds(10);

    assert_eq!(s.verify("123456", now), Ok(1));
    assert!(s.verified);
    assert_eq!(s.verified_at, Some(now));
    assert_eq!(s.state(now), SessionState::Verified);

    // Second use is rejected without touching the counter
    assert_eq!(s.verify("123456", now), Err(VerifyError::AlreadyUsed));
    assert_eq!(s.attempts, 1);
}

#[test]
fn test_wrong_codes_count_down() {
    let mut s = session(3);
    let now = s.created_at;

    for expected in [2, 1, 0] {
        assert_eq!(
            s.verify("000000", now),
            Err(VerifyError::InvalidCode {
                attempts_remaining: expected
            })
        );
    }
    assert_eq!(s.verify("123456", now), Err(VerifyError::MaxAttemptsExceeded));
    assert_eq!(s.attempts, 3);
    assert_eq!(s.state(now), SessionState::MaxAttemptsExceeded);
}

#[test]
fn test_expiry_boundary() {
    let mut s = session(3);
    let epsilon = Duration::milliseconds(1);

    assert!(!s.is_expired(s.expires_at));
    assert!(s.is_expired(s.expires_at + epsilon));

    let late = s.expires_at + epsilon;
    assert_eq!(s.verify("123456", late), Err(VerifyError::Expired));
    assert_eq!(s.attempts, 0);

    let mut s = session(3);
    assert_eq!(s.verify("123456", s.expires_at - epsilon), Ok(1));
}

#[test]
fn test_state_precedence() {
    let mut s = session(1);
    let expired_at = s.expires_at + Duration::seconds(1);

    // Exhausted and expired reads as expired
    let _ = s.verify("999999", s.created_at);
    assert_eq!(s.state(s.created_at), SessionState::MaxAttemptsExceeded);
    assert_eq!(s.state(expired_at), SessionState::Expired);
    assert!(s.is_stale(expired_at));

    // Verified beats expired
    let mut s = session(3);
    s.verify("123456", s.created_at).unwrap();
    assert_eq!(s.state(expired_at), SessionState::Verified);
    assert!(!s.is_stale(expired_at));
    assert!(!s.is_active(expired_at));
}

#[test]
fn test_candidate_of_different_length_is_rejected() {
    let mut s = session(3);
    assert_eq!(
        s.verify("1234567", s.created_at),
        Err(VerifyError::InvalidCode {
            attempts_remaining: 2
        })
    );
    assert_eq!(
        s.verify("", s.created_at),
        Err(VerifyError::InvalidCode {
            attempts_remaining: 1
        })
    );
}

#[test]
fn test_debug_redacts_code() {
    let s = session(3);
    let rendered = format!("{:?}", s);
    assert!(!rendered.contains("123456"));
    assert!(rendered.contains("<redacted>"));
}
