use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tollgate_config::{load as load_config, AppConfig, StoreBackend};
use tollgate_gateway::{create_router, GatewayState};
use tollgate_runtime::{telemetry, BackendServices};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "tollgate")]
#[command(about = "Tollgate account and session service (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Migrate => run_migrations(config).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!("starting Tollgate");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(
        services.auth.clone(),
        Duration::from_secs(config.http.request_timeout_seconds),
    );
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(tollgate_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    if let Some(pool) = services.db_pool {
        pool.close().await;
    }

    info!("Tollgate shut down");
    Ok(())
}

async fn run_migrations(config: AppConfig) -> anyhow::Result<()> {
    if config.database.backend == StoreBackend::Memory {
        warn!("memory backend selected; nothing to migrate");
        return Ok(());
    }

    let pool = tollgate_runtime::migrate(&config.database).await?;
    pool.close().await;

    info!("migrations complete");
    Ok(())
}
