//! Service entry-point: loads settings, prepares storage, and serves the
//! review API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use reviewchecker::inbound::http::health::HealthState;
use reviewchecker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use reviewchecker::server::{ServerConfig, ServerSettings, create_server};

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

async fn connect(settings: &ServerSettings, database_url: String) -> std::io::Result<DbPool> {
    if settings.run_migrations() {
        run_pending_migrations(&database_url)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
    }
    let config = PoolConfig::new(database_url).with_max_size(settings.pool_max_size());
    DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(e.into_message()))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    init_tracing(settings.log_level());

    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let mut config = ServerConfig::new(bind_addr);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect(&settings, database_url).await?);
    }

    info!(%bind_addr, database = config.uses_database(), "starting reviewchecker");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
