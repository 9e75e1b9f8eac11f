use std::{env, net::SocketAddr, path::Path};

use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Read `CONFIG_PATH` (default `config.toml`) when it exists, otherwise build
/// the config from `SERVER_HOST`/`SERVER_PORT`/`DATABASE_URL`.
pub fn load_config() -> Result<AppConfig, StartupError> {
    dotenv().ok();
    let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = if Path::new(&path).exists() { AppConfig::load_and_validate() } else { AppConfig::from_env() };
    cfg.map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Connect, migrate and build the application router.
pub async fn build_app(cfg: &AppConfig) -> Result<axum::Router, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    info!(max_connections = cfg.database.max_connections, "database_ready");

    let state = ServerState::new(db, cfg.sales.default_threshold);
    Ok(routes::build_router(state, build_cors()))
}

/// Serve until Ctrl+C.
pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
