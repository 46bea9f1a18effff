use anyhow::Context;
use feedback_server::{
    api::{AppState, create_router},
    config::ServerConfig,
    db,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting feedback server");
    let config_path = std::env::var("FEEDBACK_CONFIG").unwrap_or_else(|_| "feedback.toml".into());
    info!(path = %config_path, "loading server config");
    let config = ServerConfig::load(&config_path)
        .with_context(|| format!("failed to load server config from {config_path}"))?;

    let db = db::init_pool_and_migrate(&config.database_url)
        .await
        .context("failed to initialize database")?;

    let app = create_router(AppState::new(db, config.admin_site.clone()));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received, stopping server");
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
