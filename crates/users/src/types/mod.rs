//! Shared types for the account subsystem.

pub mod errors;
pub mod query;

pub use errors::{UserError, UserResult};
pub use query::AccountQuery;

pub type GroupId = i64;
