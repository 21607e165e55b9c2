use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use leadcast::config::{AppConfig, Cli};
use leadcast::seed::{default_leads, ensure_seeded};
use leadcast::{AppState, CampaignDispatcher, JsonFileLeadStore, SimulatedMailer, build_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "leadcast=debug,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()
        .context("failed to load configuration")?
        .apply_cli(cli);

    let store = Arc::new(JsonFileLeadStore::new(config.data_file.clone()));
    if config.seed {
        ensure_seeded(&store, &default_leads())
            .await
            .context("failed to seed lead document")?;
    }

    let mailer = Arc::new(SimulatedMailer::new(config.delivery_latency));
    let dispatcher = Arc::new(CampaignDispatcher::new(store, mailer));
    let app = build_router(AppState::new(dispatcher));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(
        bind_addr = %config.bind_addr,
        data_file = %config.data_file.display(),
        delivery_latency_ms = config.delivery_latency.as_millis() as u64,
        "campaign server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves on Ctrl-C or SIGTERM, whichever comes first.
async fn shutdown_signal() {
    tokio::select! {
        () = ctrl_c() => info!("ctrl-c received, draining connections"),
        () = sigterm() => info!("sigterm received, draining connections"),
    }
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "ctrl-c listener failed");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn sigterm() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            error!(error = %err, "sigterm listener failed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}
