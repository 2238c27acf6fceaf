use actix_web::{web, HttpServer};
use anyhow::Context;
use otp_api::telemetry::init_tracing;
use otp_api::{create_app, AppState};
use otp_core::services::otp::{OtpCleanupService, OtpManager};
use otp_infra::build_channel_registry;
use otp_shared::AppConfig;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting OtpRelay API server"
    );

    let registry =
        build_channel_registry(&config.channels).context("failed to build delivery channels")?;
    tracing::info!(channels = ?registry.names(), "Delivery channels ready");

    let manager = Arc::new(
        OtpManager::new(config.otp.clone(), registry).context("invalid OTP settings")?,
    );

    let cleanup = Arc::new(OtpCleanupService::new(manager.clone(), config.cleanup.clone()));
    let cleanup_task = cleanup.start_background_task();

    let state = web::Data::new(AppState::new(
        manager,
        config.http.clone(),
        config.server.max_payload_size,
    ));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Binding HTTP server");

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(task) = cleanup_task {
        task.abort();
    }
    tracing::info!("OtpRelay API server stopped");
    Ok(())
}
