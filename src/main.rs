//! Partner onboarding HTTP server.
//!
//! Serves the Stripe Connect refresh/return callbacks, the webhook endpoint
//! and a small onboarding entry point.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use partner_onboarding::adapters::http::{onboarding_app, OnboardingAppState};
use partner_onboarding::adapters::{InMemorySessionStore, StripeConfig, StripeConnectAdapter};
use partner_onboarding::config::AppConfig;
use partner_onboarding::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server.log_level, config.is_production());
    config.validate()?;

    if config.payment.stripe_webhook_secret.is_empty() {
        tracing::warn!("STRIPE_WEBHOOK_SECRET is not set; all webhooks will be rejected");
    }

    let platform = StripeConnectAdapter::new(StripeConfig::from_payment_config(&config.payment))?;
    let state = OnboardingAppState::new(
        Arc::new(platform),
        Arc::new(InMemorySessionStore::new()),
        config.partner.clone(),
    )
    .with_secure_cookies(config.is_production());

    let app = onboarding_app(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        "Server running on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
