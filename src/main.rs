use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fxdash::config::Config;
use fxdash::db::Storage;
use fxdash::{DashState, dash_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        covid_enabled = cfg.covid_enabled,
        loglevel = %cfg.loglevel,
        "starting fxdash"
    );

    if cfg.reset_db_on_start
        && let Some(path) = cfg.database_url.strip_prefix("sqlite:")
    {
        match std::fs::remove_file(path) {
            Ok(()) => warn!(path, "removed existing database file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    fxdash::service::chart::init_fonts();

    let storage = Storage::connect(&cfg.database_url).await?;
    let addr = cfg.listen_addr.clone();
    let state = DashState::new(storage, cfg)?;
    let app = dash_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
