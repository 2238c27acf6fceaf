//! HTTP adapter for the OtpRelay session manager
//!
//! Exposes the manager's operations as JSON endpoints under `/api/v1/otp`.
//! Handlers do request validation and error mapping only.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
