//! HTTP routes

pub mod health;
pub mod otp;

use actix_web::web;

/// Mount every route on an app or scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(web::scope("/api/v1/otp").configure(otp::configure));
}
