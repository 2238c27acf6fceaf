//! Business services containing domain logic and use cases.

pub mod clock;
pub mod otp;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use otp::{
    new_correlation_id, ChannelRegistry, CleanupResult, CodeAlphabet, CodeGenerator,
    DeliveryChannel, DeliveryReceipt, GenerateResult, OtpCleanupService, OtpManager, OtpStats,
    ResendResult, SessionStatusView, VerifySuccess,
};
