//! Backend entry-point: loads configuration, prepares storage and serves the
//! REST endpoints and OpenAPI docs.

mod server;

use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cinema_backend::outbound::persistence::{DbPool, run_pending_migrations};

use server::{AppSettings, ServerConfig, create_server, load_settings};

async fn prepare_database(settings: &AppSettings) -> Result<Option<DbPool>> {
    let Some(pool_config) = settings.pool_config() else {
        warn!("no database URL configured; using the in-memory store");
        return Ok(None);
    };

    if settings.run_migrations() {
        let url = pool_config.database_url().to_owned();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .wrap_err("migration task panicked")?
            .wrap_err("failed to apply migrations")?;
        info!(applied, "database migrations complete");
    }

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("CINEMA_BIND_ADDR is not a socket address")?;

    let mut config = ServerConfig::new(bind_addr, settings.operation_deadline());
    if let Some(pool) = prepare_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let (server, health_state) = create_server(config)?;
    info!(%bind_addr, "listening");
    server.await?;
    health_state.mark_draining();
    Ok(())
}
