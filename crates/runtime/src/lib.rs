use std::sync::Arc;

use anyhow::{Context, Result};
use bunch_config::AppConfig;
use bunch_database::initialize_database;
use bunch_users::{AccountRepository, AccountService, GroupRepository};
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::DEBUG)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub accounts: Arc<AccountService<AccountRepository>>,
    pub groups: GroupRepository,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        let accounts = Arc::new(AccountService::new(db_pool.clone()));
        let groups = GroupRepository::new(db_pool.clone());

        let account_count = accounts
            .count_accounts()
            .await
            .context("failed to read account table")?;
        info!(accounts = account_count, "account store ready");

        Ok(Self {
            db_pool,
            accounts,
            groups,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
