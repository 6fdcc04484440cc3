//! Shared application state for the gateway

use std::sync::Arc;

use bunch_config::{DatabaseConfig, MediaConfig};
use bunch_users::{AccountRepository, AccountService, GroupRepository};
use sqlx::SqlitePool;

use crate::error::{GatewayError, GatewayResult};

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    pub account_service: Arc<AccountService<AccountRepository>>,
    pub groups: GroupRepository,
    /// Used to turn stored avatar paths into URLs
    pub media: MediaConfig,
}

impl GatewayState {
    pub fn new(pool: SqlitePool, media: MediaConfig) -> Self {
        let account_service = Arc::new(AccountService::new(pool.clone()));
        let groups = GroupRepository::new(pool.clone());

        Self {
            pool,
            account_service,
            groups,
            media,
        }
    }

    /// Create gateway state from database configuration
    pub async fn from_config(config: &DatabaseConfig, media: MediaConfig) -> GatewayResult<Self> {
        let pool = bunch_database::initialize_database(config)
            .await
            .map_err(|e| GatewayError::DatabaseError(format!("Failed to initialize database: {e}")))?;

        Ok(Self::new(pool, media))
    }

    pub fn account_service(&self) -> &AccountService<AccountRepository> {
        &self.account_service
    }

    pub fn groups(&self) -> &GroupRepository {
        &self.groups
    }
}

/// Create a gateway state over a fresh in-memory database
pub async fn create_test_gateway_state() -> GatewayResult<GatewayState> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };

    GatewayState::from_config(&config, MediaConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_gateway_state() {
        let state = create_test_gateway_state().await.unwrap();

        assert_eq!(state.account_service().count_accounts().await.unwrap(), 0);
        assert!(state.groups().list().await.unwrap().is_empty());
    }
}
