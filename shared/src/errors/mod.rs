//! Error codes shared between the domain and the API surface

/// Stable error codes returned to API clients
pub mod error_codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

    // Verification path
    pub const INVALID_SESSION: &str = "INVALID_SESSION";
    pub const ALREADY_USED: &str = "ALREADY_USED";
    pub const MAX_ATTEMPTS_EXCEEDED: &str = "MAX_ATTEMPTS_EXCEEDED";
    pub const EXPIRED: &str = "EXPIRED";
    pub const INVALID_CODE: &str = "INVALID_CODE";

    // Resend path
    pub const SESSION_NOT_FOUND: &str = "SESSION_NOT_FOUND";
    pub const ALREADY_VERIFIED: &str = "ALREADY_VERIFIED";
    pub const SESSION_EXPIRED: &str = "SESSION_EXPIRED";

    // Delivery
    pub const CHANNEL_DELIVERY_FAILED: &str = "CHANNEL_DELIVERY_FAILED";
}
