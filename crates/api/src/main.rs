use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use office_monitor_api::{
    app::{create_app, AppState},
    config::Config,
    middleware::{init_metrics, logging::init_logging},
};
use persistence::repositories::{ApplicationRepository, OfficialRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging);
    init_metrics().context("Failed to install Prometheus recorder")?;

    info!("Starting Office Monitor API v{}", env!("CARGO_PKG_VERSION"));

    let rosters = config
        .hierarchy
        .load_rosters()
        .context("Failed to load monitor rosters")?;
    info!(
        roster_path = %config.hierarchy.roster_path,
        monitors = rosters.len(),
        "Monitor rosters loaded"
    );

    let pool = persistence::db::connect(&config.database.pool_config()).await?;

    info!("Running database migrations...");
    persistence::db::migrate(&pool).await?;
    info!("Migrations completed");

    let addr = config.socket_addr()?;
    let state = AppState::new(
        config,
        Arc::new(ApplicationRepository::new(pool.clone())),
        Arc::new(OfficialRepository::new(pool)),
        rosters,
    )?;
    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
