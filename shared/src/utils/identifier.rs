//! Email and device-token helpers, plus identifier masking for logs

use once_cell::sync::Lazy;
use regex::Regex;

use super::phone::mask_phone_number;

// Deliberately simple: one '@', no whitespace, a dot in the domain.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]{1,64}@[^\s@]{1,255}\.[^\s@.]{2,63}$")
        .expect("static email pattern compiles")
});

static DEVICE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_:\-.]{16,4096}$").expect("static device token pattern compiles")
});

/// Check if an email address is plausibly deliverable
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check if a push device token has an acceptable shape
pub fn is_valid_device_token(token: &str) -> bool {
    DEVICE_TOKEN_REGEX.is_match(token)
}

/// Mask an email address, keeping the first character of the local part
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

/// Mask any destination identifier for logging
///
/// Emails keep their domain, phone-like values keep their last four digits,
/// and everything else keeps only its first four characters.
pub fn mask_identifier(identifier: &str) -> String {
    if identifier.contains('@') {
        mask_email(identifier)
    } else if identifier.starts_with('+') {
        mask_phone_number(identifier)
    } else {
        let prefix: String = identifier.chars().take(4).collect();
        format!("{}***", prefix)
    }
}
