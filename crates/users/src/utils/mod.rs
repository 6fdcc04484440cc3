//! Internal utilities for the account subsystem.

pub mod password;
pub mod validation;

pub use password::*;
pub use validation::*;
