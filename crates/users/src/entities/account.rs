use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Color, ThemePreference};
use crate::types::UserResult;
use crate::utils::{validate_email, validate_max_chars, validate_username, verify_password};

pub const STATUS_MAX_CHARS: usize = 30;
pub const PRONOUN_MAX_CHARS: usize = 12;

/// Credentials and permission flags of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Login identifier, unique across accounts
    pub email: String,
    /// Secondary unique handle, not used for login
    pub username: String,
    /// Argon2 PHC string; `None` means the password is unusable
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Presentation attributes layered on top of an identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Path of the uploaded image, relative to the media root
    pub avatar: Option<String>,
    pub status: Option<String>,
    pub bio: Option<String>,
    pub theme_preference: ThemePreference,
    /// Filled in on first save when left empty
    pub color: Option<Color>,
    pub pronoun: Option<String>,
}

/// A persisted identity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub profile: Profile,
}

impl Account {
    /// Create an unsaved account with default flags and an empty profile.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity: Identity {
                email: email.into(),
                username: username.into(),
                password_hash: None,
                first_name: None,
                last_name: None,
                is_active: true,
                is_staff: false,
                is_superuser: false,
                date_joined: Utc::now(),
                last_login: None,
            },
            profile: Profile::default(),
        }
    }

    /// Check every field constraint, email first.
    ///
    /// Never mutates the account, so calling it repeatedly is harmless.
    pub fn validate(&self) -> UserResult<()> {
        validate_email(&self.identity.email)?;
        validate_username(&self.identity.username)?;
        validate_max_chars("status", self.profile.status.as_deref(), STATUS_MAX_CHARS)?;
        validate_max_chars("pronoun", self.profile.pronoun.as_deref(), PRONOUN_MAX_CHARS)?;
        Ok(())
    }

    pub fn color(&self) -> Option<Color> {
        self.profile.color
    }

    /// "First Last", trimmed; empty when neither name is set.
    pub fn full_name(&self) -> String {
        let first = self.identity.first_name.as_deref().unwrap_or_default();
        let last = self.identity.last_name.as_deref().unwrap_or_default();
        format!("{first} {last}").trim().to_string()
    }

    pub fn has_usable_password(&self) -> bool {
        self.identity.password_hash.is_some()
    }

    pub fn check_password(&self, password: &str) -> bool {
        match self.identity.password_hash.as_deref() {
            Some(hash) => verify_password(password, hash).unwrap_or(false),
            None => false,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity.username)
    }
}

/// Input for provisioning a new account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub profile: Profile,
}

impl NewAccount {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: Some(password.into()),
            ..Default::default()
        }
    }
}

/// Partial edit of an existing account.
///
/// `None` leaves a field untouched. For optional text fields an empty
/// string clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub avatar: Option<String>,
    pub status: Option<String>,
    pub bio: Option<String>,
    pub theme_preference: Option<ThemePreference>,
    pub color: Option<Color>,
    pub pronoun: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.is_active.is_none()
            && self.is_staff.is_none()
            && self.is_superuser.is_none()
            && self.avatar.is_none()
            && self.status.is_none()
            && self.bio.is_none()
            && self.theme_preference.is_none()
            && self.color.is_none()
            && self.pronoun.is_none()
    }

    /// Copy the provided fields onto `account`. Does not validate.
    pub fn apply_to(self, account: &mut Account) {
        let identity = &mut account.identity;
        let profile = &mut account.profile;

        if let Some(email) = self.email {
            identity.email = email;
        }
        if let Some(username) = self.username {
            identity.username = username;
        }
        if let Some(first_name) = self.first_name {
            identity.first_name = non_empty(first_name);
        }
        if let Some(last_name) = self.last_name {
            identity.last_name = non_empty(last_name);
        }
        if let Some(is_active) = self.is_active {
            identity.is_active = is_active;
        }
        if let Some(is_staff) = self.is_staff {
            identity.is_staff = is_staff;
        }
        if let Some(is_superuser) = self.is_superuser {
            identity.is_superuser = is_superuser;
        }

        if let Some(avatar) = self.avatar {
            profile.avatar = non_empty(avatar);
        }
        if let Some(status) = self.status {
            profile.status = non_empty(status);
        }
        if let Some(bio) = self.bio {
            profile.bio = non_empty(bio);
        }
        if let Some(theme) = self.theme_preference {
            profile.theme_preference = theme;
        }
        if let Some(color) = self.color {
            profile.color = Some(color);
        }
        if let Some(pronoun) = self.pronoun {
            profile.pronoun = non_empty(pronoun);
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
