//! Storage for accounts and groups.
//!
//! [`AccountStore`] is the seam between the account service and durable
//! storage. Uniqueness of `email` and `username` is enforced by the store,
//! which reports violations as [`UserError::UniquenessConflict`].
//!
//! [`UserError::UniquenessConflict`]: crate::types::UserError::UniquenessConflict

pub mod account_repository;
pub mod group_repository;
pub mod memory;

pub use account_repository::AccountRepository;
pub use group_repository::GroupRepository;
pub use memory::InMemoryAccountStore;

use uuid::Uuid;

use crate::entities::Account;
use crate::types::{AccountQuery, UserResult};

/// Durable keyed record store for accounts
#[allow(async_fn_in_trait)]
pub trait AccountStore {
    /// Insert the account, or update it if its id is already stored.
    async fn persist(&self, account: &Account) -> UserResult<()>;
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<Account>>;
    async fn find_by_email(&self, email: &str) -> UserResult<Option<Account>>;
    async fn find_by_username(&self, username: &str) -> UserResult<Option<Account>>;
    async fn list(&self, query: &AccountQuery) -> UserResult<Vec<Account>>;
    async fn count(&self) -> UserResult<i64>;
}
