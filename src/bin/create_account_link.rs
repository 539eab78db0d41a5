//! Create a connected account for the configured partner and print the
//! onboarding link to send them.

use std::process::ExitCode;
use std::sync::Arc;

use partner_onboarding::adapters::{StripeConfig, StripeConnectAdapter};
use partner_onboarding::application::onboarding::{
    StartOnboardingCommand, StartOnboardingHandler,
};
use partner_onboarding::config::AppConfig;
use partner_onboarding::telemetry::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.server.log_level, false);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let platform = match StripeConnectAdapter::new(StripeConfig::from_payment_config(&config.payment)) {
        Ok(platform) => platform,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialise Stripe client");
            return ExitCode::FAILURE;
        }
    };

    let handler = StartOnboardingHandler::new(Arc::new(platform), config.partner.clone());
    match handler.handle(StartOnboardingCommand::default()).await {
        Ok(result) => {
            println!("Account created: {}", result.account_id);
            println!("Send this URL to your partner: {}", result.onboarding_url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start onboarding");
            ExitCode::FAILURE
        }
    }
}
