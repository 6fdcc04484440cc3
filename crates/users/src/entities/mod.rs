//! Domain entities for the account subsystem.
//!
//! An [`Account`] is an [`Identity`] (credentials and permission flags)
//! composed with a [`Profile`] (avatar, status, bio, theme, color, pronoun).

pub mod account;
pub mod color;
pub mod group;
pub mod theme;

pub use account::{Account, AccountChanges, Identity, NewAccount, Profile};
pub use color::Color;
pub use group::Group;
pub use theme::ThemePreference;
