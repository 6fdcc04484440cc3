//! # Bunch Users Crate
//!
//! Account management for Bunch: the account entity with its profile
//! attributes, the color palette and assignment policy, account and group
//! storage, and the service that validates and persists accounts.
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (Account, Identity, Profile, Color, Group)
//! - **Services**: Account lifecycle and color assignment
//! - **Repositories**: SQLite and in-memory storage
//! - **Types**: Errors and list queries
//! - **Utils**: Validation and password hashing
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bunch_users::{AccountService, NewAccount};
//!
//! # async fn run(pool: sqlx::SqlitePool) -> bunch_users::UserResult<()> {
//! let service = AccountService::new(pool);
//! let account = service
//!     .create_account(NewAccount::new("test", "test@bunch.io", "testpassword"))
//!     .await?;
//! assert!(account.color().is_some());
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use entities::{
    Account, AccountChanges, Color, Group, Identity, NewAccount, Profile, ThemePreference,
};
pub use repositories::{AccountRepository, AccountStore, GroupRepository, InMemoryAccountStore};
pub use services::{assign_color, assign_color_with, AccountService};
pub use types::{AccountQuery, GroupId, UserError, UserResult};
