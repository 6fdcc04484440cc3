//! In-process account storage with the same uniqueness rules as the database.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AccountStore;
use crate::entities::Account;
use crate::types::{AccountQuery, UserError, UserResult};

/// Account store kept in memory, used by tests and embedded setups
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    async fn persist(&self, account: &Account) -> UserResult<()> {
        let mut accounts = self.accounts.write().await;

        let others = accounts.values().filter(|other| other.id != account.id);
        for other in others {
            if other.identity.email == account.identity.email {
                return Err(UserError::conflict("email"));
            }
            if other.identity.username == account.identity.username {
                return Err(UserError::conflict("username"));
            }
        }

        if account.profile.color.is_none() {
            return Err(UserError::Constraint(
                "NOT NULL constraint failed: accounts.color".to_string(),
            ));
        }

        let mut stored = account.clone();
        if let Some(existing) = accounts.get(&account.id) {
            stored.identity.date_joined = existing.identity.date_joined;
        }
        accounts.insert(account.id, stored);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.identity.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.identity.username == username)
            .cloned())
    }

    async fn list(&self, query: &AccountQuery) -> UserResult<Vec<Account>> {
        let accounts = self.accounts.read().await;

        let mut matching: Vec<Account> = accounts
            .values()
            .filter(|account| query.matches(account))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.identity
                .date_joined
                .cmp(&b.identity.date_joined)
                .then_with(|| a.id.cmp(&b.id))
        });

        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map(|limit| limit as usize).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> UserResult<i64> {
        let accounts = self.accounts.read().await;
        Ok(accounts.len() as i64)
    }
}
