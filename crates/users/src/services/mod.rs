//! Business logic services for the account subsystem.

pub mod account_service;
pub mod color_policy;

pub use account_service::AccountService;
pub use color_policy::{assign_color, assign_color_with};
