//! Request and response bodies for the HTTP API

pub mod otp;

pub use otp::{
    ResendOtpRequest, SendOtpRequest, SendOtpResponse, SessionStatusResponse, VerifyOtpRequest,
};
