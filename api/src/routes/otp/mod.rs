//! OTP session endpoints under `/api/v1/otp`

pub mod resend;
pub mod send;
pub mod stats;
pub mod status;
pub mod verify;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/send", web::post().to(send::send_otp))
        .route("/verify", web::post().to(verify::verify_otp))
        .route("/resend", web::post().to(resend::resend_otp))
        .route("/status/{session_id}", web::get().to(status::session_status))
        .route("/stats", web::get().to(stats::otp_stats));
}
