//! Listing filters for accounts.

use serde::{Deserialize, Serialize};

use crate::entities::Account;

/// Filters applied when listing accounts.
///
/// `search` is matched case-insensitively against email, username, first
/// and last name, bio and status. Results are ordered by `date_joined`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountQuery {
    pub search: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl AccountQuery {
    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Whether an account passes the flag filters and search term.
    pub fn matches(&self, account: &Account) -> bool {
        if let Some(is_staff) = self.is_staff {
            if account.identity.is_staff != is_staff {
                return false;
            }
        }

        if let Some(is_active) = self.is_active {
            if account.identity.is_active != is_active {
                return false;
            }
        }

        let Some(term) = self.search_term() else {
            return true;
        };
        let needle = term.to_lowercase();

        let identity = &account.identity;
        let profile = &account.profile;
        [
            Some(identity.email.as_str()),
            Some(identity.username.as_str()),
            identity.first_name.as_deref(),
            identity.last_name.as_deref(),
            profile.bio.as_deref(),
            profile.status.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_is_ignored() {
        let query = AccountQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), None);
        assert!(query.matches(&Account::new("test", "test@bunch.io")));
    }

    #[test]
    fn test_search_covers_profile_fields() {
        let mut account = Account::new("test", "test@bunch.io");
        account.profile.status = Some("Gone fishing".to_string());

        let query = AccountQuery {
            search: Some("FISH".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&account));

        let query = AccountQuery {
            search: Some("hiking".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&account));
    }

    #[test]
    fn test_flag_filters() {
        let mut staff = Account::new("staff", "staff@bunch.io");
        staff.identity.is_staff = true;
        let member = Account::new("member", "member@bunch.io");

        let query = AccountQuery {
            is_staff: Some(true),
            ..Default::default()
        };
        assert!(query.matches(&staff));
        assert!(!query.matches(&member));

        let query = AccountQuery {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!query.matches(&member));
    }
}
