//! CORS configuration for browser clients.
//!
//! Origins come from `http.allowed_origins`. An empty list allows any origin,
//! which suits local development; production deployments should list their
//! front-end origins explicitly.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use otp_shared::HttpConfig;

const PREFLIGHT_MAX_AGE_SECONDS: usize = 3600;

/// Build the CORS middleware from the HTTP adapter settings
pub fn create_cors(config: &HttpConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(PREFLIGHT_MAX_AGE_SECONDS);

    if config.allowed_origins.is_empty() {
        tracing::debug!("CORS allows any origin");
        return cors.allow_any_origin();
    }

    config
        .allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
