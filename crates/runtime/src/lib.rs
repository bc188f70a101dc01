use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tollgate_config::{AppConfig, DatabaseConfig, StoreBackend};
use tollgate_database::{initialize_database, SqliteUserStore};
use tollgate_users::{AuthUseCase, InMemoryUserStore, UserStore};
use tracing::{info, warn};

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub store: Arc<dyn UserStore>,
    pub auth: Arc<AuthUseCase>,
    /// Present only for the SQLite backend.
    pub db_pool: Option<SqlitePool>,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let (store, db_pool): (Arc<dyn UserStore>, Option<SqlitePool>) =
            match config.database.backend {
                StoreBackend::Sqlite => {
                    let pool = migrate(&config.database).await?;
                    (Arc::new(SqliteUserStore::new(pool.clone())), Some(pool))
                }
                StoreBackend::Memory => {
                    warn!("using in-memory user store; accounts are lost on restart");
                    (Arc::new(InMemoryUserStore::new()), None)
                }
            };

        let auth = Arc::new(AuthUseCase::new(store.clone(), &config.auth));
        info!(
            backend = config.database.backend.as_str(),
            token_ttl_seconds = config.auth.token_ttl_seconds,
            "auth use case ready"
        );

        Ok(Self {
            store,
            auth,
            db_pool,
        })
    }
}

/// Open the SQLite database and bring its schema up to date.
pub async fn migrate(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = initialize_database(config)
        .await
        .with_context(|| format!("failed to initialise database {}", config.url))?;
    info!(url = %config.url, "database ready");
    Ok(pool)
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
