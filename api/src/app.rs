//! Application state and factory

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpResponse};
use otp_core::services::otp::OtpManager;
use otp_shared::{error_codes, ApiResponse, ErrorDetail, HttpConfig};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::handlers::json_error_handler;
use crate::middleware::create_cors;
use crate::routes;

/// Shared state handed to every handler
pub struct AppState {
    pub manager: Arc<OtpManager>,
    pub http: HttpConfig,
    pub max_payload_size: usize,
}

impl AppState {
    pub fn new(manager: Arc<OtpManager>, http: HttpConfig, max_payload_size: usize) -> Self {
        Self {
            manager,
            http,
            max_payload_size,
        }
    }
}

/// Build the actix application around the given state
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = create_cors(&state.http);
    let json_config = web::JsonConfig::default()
        .limit(state.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(state)
        .app_data(json_config)
        .wrap(cors)
        .wrap(TracingLogger::default())
        .configure(routes::configure)
        .default_service(web::route().to(not_found))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(ErrorDetail::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    )))
}
