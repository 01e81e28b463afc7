use std::sync::Arc;

use cadastro_pessoas::config::Config;
use cadastro_pessoas::db::{PessoaStorage, connect};
use cadastro_pessoas::service::{FixedCredentials, MemorySessionStore, PessoaService};
use cadastro_pessoas::{CadastroState, cadastro_router};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        listen_addr = %cfg.basic.listen_addr,
        loglevel = %cfg.basic.loglevel,
        login = %cfg.auth.login,
        secure_cookie = cfg.basic.secure_cookie,
        session_ttl_hours = cfg.basic.session_ttl_hours
    );
    if cfg.basic.cookie_secret.is_none() {
        warn!("no cookie_secret configured; sessions will not survive a restart");
    }

    let pool = connect(&cfg.basic.database_url, cfg.basic.max_connections).await?;
    let storage = PessoaStorage::new(pool);
    storage.init_schema().await?;

    let state = CadastroState::new(
        PessoaService::new(storage),
        Arc::new(MemorySessionStore::with_ttl(cfg.session_ttl())),
        Arc::new(FixedCredentials::from(&cfg.auth)),
        cfg.cookie_key(),
        cfg.basic.secure_cookie,
    );
    let app = cadastro_router(state);

    let listener = TcpListener::bind(&cfg.basic.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
