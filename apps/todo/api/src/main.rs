use axum_helpers::server::create_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    info!(
        default_locale = %config.i18n.default_locale,
        supported_locales = ?config.i18n.supported_locales,
        "Localizing validation messages"
    );

    let api_routes = api::routes(&config.i18n)?;

    // create_router adds docs, /health and middleware to our composed routes
    let app = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, config.app)?;

    info!("Starting {} v{}", config.app.name, config.app.version);
    create_app(app, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Todo API shutdown complete");
    Ok(())
}
