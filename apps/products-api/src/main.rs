//! Products API - REST server

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::connect_with_retry;
use database::retry::RetryPolicy;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        max_connections = config.database.max_connections,
        "Connecting to PostgreSQL"
    );
    let db = connect_with_retry(config.database.clone(), &RetryPolicy::default()).await?;
    info!("Successfully connected to PostgreSQL");

    domain_products::ensure_schema(&db).await?;

    let state = AppState {
        config: config.clone(),
        db,
    };

    let api_routes = api::routes(&state).merge(health_router(state.config.app));
    let app = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    let db = state.db.clone();
    create_production_app(
        app,
        &state.config.server,
        state.config.shutdown_timeout,
        async move {
            info!("Shutting down: closing PostgreSQL pool");
            match db.close().await {
                Ok(()) => info!("PostgreSQL pool closed"),
                Err(e) => tracing::warn!("Failed to close PostgreSQL pool: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
