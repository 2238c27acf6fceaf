//! Type definitions shared by the API surface
//!
//! - `response` - API response envelope and health checks

pub mod response;

pub use response::{ApiResponse, ErrorDetail, HealthResponse, HealthStatus};
