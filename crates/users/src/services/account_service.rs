//! Account service for provisioning, saving and editing accounts.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use super::color_policy::assign_color;
use crate::entities::{Account, AccountChanges, NewAccount};
use crate::repositories::{AccountRepository, AccountStore, InMemoryAccountStore};
use crate::types::{AccountQuery, UserError, UserResult};
use crate::utils::{hash_password, normalize_email};

/// Service for managing account operations
pub struct AccountService<S> {
    store: S,
}

impl AccountService<AccountRepository> {
    /// Create a new account service backed by the database
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_store(AccountRepository::new(pool))
    }
}

impl AccountService<InMemoryAccountStore> {
    /// Create a new account service that keeps accounts in memory
    pub fn in_memory() -> Self {
        Self::with_store(InMemoryAccountStore::new())
    }
}

impl<S> AccountService<S>
where
    S: AccountStore,
{
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Validate, fill in defaults and persist an account.
    ///
    /// Validation always runs first; a rejected account is left untouched
    /// and nothing is written. A missing color is assigned exactly once,
    /// and `account` only picks it up after the store accepted the write.
    pub async fn save(&self, account: &mut Account) -> UserResult<()> {
        if let Err(err) = account.validate() {
            warn!(account_id = %account.id, error = %err, "rejected account save");
            return Err(err);
        }

        let mut staged = account.clone();
        if staged.profile.color.is_none() {
            staged.profile.color = Some(assign_color(staged.identity.is_superuser));
        }

        self.store.persist(&staged).await?;

        *account = staged;
        Ok(())
    }

    /// Provision a regular account
    pub async fn create_account(&self, request: NewAccount) -> UserResult<Account> {
        let account = self.provision(request).await?;

        info!(account_id = %account.id, username = %account, "created account");
        Ok(account)
    }

    /// Provision an account with staff and superuser flags set
    pub async fn create_superuser(&self, mut request: NewAccount) -> UserResult<Account> {
        request.is_staff = true;
        request.is_superuser = true;

        let account = self.provision(request).await?;

        info!(account_id = %account.id, username = %account, "created superuser");
        Ok(account)
    }

    async fn provision(&self, request: NewAccount) -> UserResult<Account> {
        if request.username.is_empty() {
            return Err(UserError::required(
                "username",
                "The given username must be set.",
            ));
        }

        let mut account = Account::new(request.username, normalize_email(&request.email));
        account.identity.first_name = request.first_name;
        account.identity.last_name = request.last_name;
        account.identity.is_staff = request.is_staff;
        account.identity.is_superuser = request.is_superuser;
        account.profile = request.profile;

        if let Some(password) = request.password {
            account.identity.password_hash = Some(hash_password(&password)?);
        }

        self.save(&mut account).await?;
        Ok(account)
    }

    /// Get an account by ID
    pub async fn get_account(&self, id: Uuid) -> UserResult<Account> {
        self.store.find_by_id(id).await?.ok_or(UserError::NotFound)
    }

    /// Get an account by its login email
    pub async fn get_by_email(&self, email: &str) -> UserResult<Option<Account>> {
        self.store.find_by_email(&normalize_email(email)).await
    }

    pub async fn get_by_username(&self, username: &str) -> UserResult<Option<Account>> {
        self.store.find_by_username(username).await
    }

    pub async fn list_accounts(&self, query: &AccountQuery) -> UserResult<Vec<Account>> {
        self.store.list(query).await
    }

    pub async fn count_accounts(&self) -> UserResult<i64> {
        self.store.count().await
    }

    /// Apply a partial edit and save it.
    ///
    /// The stored color is kept unless the edit sets one explicitly, even
    /// when the superuser flag changes.
    pub async fn update_account(&self, id: Uuid, mut changes: AccountChanges) -> UserResult<Account> {
        let mut account = self.get_account(id).await?;
        if changes.is_empty() {
            return Ok(account);
        }

        changes.email = changes.email.map(|email| normalize_email(&email));
        changes.apply_to(&mut account);

        self.save(&mut account).await?;

        info!(account_id = %id, username = %account, "updated account");
        Ok(account)
    }

    pub async fn set_password(&self, id: Uuid, password: &str) -> UserResult<Account> {
        let mut account = self.get_account(id).await?;
        account.identity.password_hash = Some(hash_password(password)?);

        self.save(&mut account).await?;
        Ok(account)
    }

    /// Check a password against the stored hash of an account
    pub async fn check_password(&self, id: Uuid, password: &str) -> UserResult<bool> {
        let account = self.get_account(id).await?;
        Ok(account.check_password(password))
    }

    /// Look up an account by email and check its password.
    ///
    /// Returns `None` for unknown emails, wrong passwords and inactive accounts.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<Option<Account>> {
        let Some(account) = self.get_by_email(email).await? else {
            return Ok(None);
        };

        if !account.identity.is_active || !account.check_password(password) {
            return Ok(None);
        }

        Ok(Some(account))
    }

    pub async fn record_login(&self, id: Uuid) -> UserResult<Account> {
        let mut account = self.get_account(id).await?;
        account.identity.last_login = Some(Utc::now());

        self.save(&mut account).await?;
        Ok(account)
    }

    /// Accounts are never removed; they are switched off instead
    pub async fn deactivate(&self, id: Uuid) -> UserResult<Account> {
        let mut account = self.get_account(id).await?;
        account.identity.is_active = false;

        self.save(&mut account).await?;

        warn!(account_id = %id, username = %account, "deactivated account");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Color, ThemePreference};

    fn create_test_service() -> AccountService<InMemoryAccountStore> {
        AccountService::in_memory()
    }

    fn test_request() -> NewAccount {
        NewAccount::new("test", "test@bunch.io", "testpassword")
    }

    fn root_request() -> NewAccount {
        NewAccount::new("root", "root@bunch.io", "rootpassword")
    }

    #[tokio::test]
    async fn test_create_account_defaults() {
        let service = create_test_service();

        let account = service.create_account(test_request()).await.unwrap();

        assert_eq!(account.identity.username, "test");
        assert_eq!(account.identity.email, "test@bunch.io");
        assert!(account.identity.is_active);
        assert!(!account.identity.is_staff);
        assert!(!account.identity.is_superuser);
        assert_eq!(account.to_string(), "test");
        assert!(account.check_password("testpassword"));
        assert!(!account.check_password("wrongpassword"));

        let color = account.color().unwrap();
        assert!(Color::PALETTE.contains(&color));
    }

    #[tokio::test]
    async fn test_create_superuser_gets_silver() {
        let service = create_test_service();

        let root = service.create_superuser(root_request()).await.unwrap();

        assert!(root.identity.is_active);
        assert!(root.identity.is_staff);
        assert!(root.identity.is_superuser);
        assert_eq!(root.color(), Some(Color::Silver));
        assert_eq!(root.color().unwrap().hex(), "#bdc3c7");
    }

    #[tokio::test]
    async fn test_every_superuser_gets_silver() {
        let service = create_test_service();

        for i in 0..50 {
            let request = NewAccount::new(format!("root{i}"), format!("root{i}@bunch.io"), "pw");
            let root = service.create_superuser(request).await.unwrap();
            assert_eq!(root.color(), Some(Color::NEUTRAL));
        }
    }

    #[tokio::test]
    async fn test_empty_email_is_rejected_and_not_stored() {
        let service = create_test_service();

        let request = NewAccount::new("test2", "", "testpassword");
        let result = service.create_account(request).await;

        assert!(matches!(
            result,
            Err(UserError::RequiredField { field: "email", .. })
        ));
        assert_eq!(service.count_accounts().await.unwrap(), 0);
        assert!(service.get_by_username("test2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_username_is_rejected() {
        let service = create_test_service();

        let request = NewAccount::new("", "test@bunch.io", "testpassword");
        let result = service.create_account(request).await;

        match result {
            Err(UserError::RequiredField { field, message }) => {
                assert_eq!(field, "username");
                assert_eq!(message, "The given username must be set.");
            }
            other => panic!("expected a required username error, got {other:?}"),
        }
        assert_eq!(service.count_accounts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let service = create_test_service();
        service.create_account(test_request()).await.unwrap();

        let result = service
            .create_account(NewAccount::new("test2", "test@bunch.io", "testpassword"))
            .await;

        assert_eq!(result.unwrap_err(), UserError::conflict("email"));
        assert_eq!(service.count_accounts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let service = create_test_service();
        service.create_account(test_request()).await.unwrap();

        let result = service
            .create_account(NewAccount::new("test", "test2@bunch.io", "testpassword"))
            .await;

        assert_eq!(result.unwrap_err(), UserError::conflict("username"));
    }

    #[tokio::test]
    async fn test_email_domain_is_normalized() {
        let service = create_test_service();

        let account = service
            .create_account(NewAccount::new("test", "Test@BUNCH.IO", "pw"))
            .await
            .unwrap();

        assert_eq!(account.identity.email, "Test@bunch.io");
        assert!(service.get_by_email("Test@bunch.io").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_rejected_account_is_unchanged() {
        let service = create_test_service();
        let mut account = Account::new("test", "");
        let before = account.clone();

        assert!(service.save(&mut account).await.is_err());
        assert_eq!(account, before);
        assert!(account.color().is_none());
    }

    #[tokio::test]
    async fn test_save_keeps_account_untouched_on_conflict() {
        let service = create_test_service();
        service.create_account(test_request()).await.unwrap();

        let mut duplicate = Account::new("other", "test@bunch.io");
        let result = service.save(&mut duplicate).await;

        assert!(matches!(result, Err(UserError::UniquenessConflict { .. })));
        assert!(duplicate.color().is_none());
    }

    #[tokio::test]
    async fn test_explicit_color_is_kept() {
        let service = create_test_service();
        let mut request = root_request();
        request.profile.color = Some(Color::Honey);

        let root = service.create_superuser(request).await.unwrap();
        assert_eq!(root.color(), Some(Color::Honey));
    }

    #[tokio::test]
    async fn test_color_is_not_reassigned_on_later_saves() {
        let service = create_test_service();
        let mut account = service.create_account(test_request()).await.unwrap();
        let color = account.color();

        for _ in 0..10 {
            service.save(&mut account).await.unwrap();
            assert_eq!(account.color(), color);
        }
    }

    #[tokio::test]
    async fn test_promotion_does_not_recolor() {
        let service = create_test_service();
        let mut request = test_request();
        request.profile.color = Some(Color::Ruby);
        let account = service.create_account(request).await.unwrap();

        let promoted = service
            .update_account(
                account.id,
                AccountChanges {
                    is_superuser: Some(true),
                    is_staff: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(promoted.identity.is_superuser);
        assert_eq!(promoted.color(), Some(Color::Ruby));
    }

    #[tokio::test]
    async fn test_update_profile_fields() {
        let service = create_test_service();
        let account = service.create_account(test_request()).await.unwrap();

        let updated = service
            .update_account(
                account.id,
                AccountChanges {
                    status: Some("On holiday".to_string()),
                    bio: Some("Likes rust".to_string()),
                    theme_preference: Some(ThemePreference::Dark),
                    pronoun: Some("they/them".to_string()),
                    avatar: Some("avatars/test.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.profile.status.as_deref(), Some("On holiday"));
        assert_eq!(updated.profile.theme_preference, ThemePreference::Dark);
        assert_eq!(updated.profile.pronoun.as_deref(), Some("they/them"));
        assert_eq!(updated.color(), account.color());

        let stored = service.get_account(account.id).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_with_invalid_email_fails_before_write() {
        let service = create_test_service();
        let account = service.create_account(test_request()).await.unwrap();

        let result = service
            .update_account(
                account.id,
                AccountChanges {
                    email: Some(String::new()),
                    bio: Some("never stored".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(UserError::RequiredField { field: "email", .. })
        ));
        let stored = service.get_account(account.id).await.unwrap();
        assert!(stored.profile.bio.is_none());
        assert_eq!(stored.identity.email, "test@bunch.io");
    }

    #[tokio::test]
    async fn test_update_nonexistent_account() {
        let service = create_test_service();

        let result = service
            .update_account(
                Uuid::new_v4(),
                AccountChanges {
                    bio: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(result.unwrap_err(), UserError::NotFound);
    }

    #[tokio::test]
    async fn test_verify_credentials_and_deactivate() {
        let service = create_test_service();
        let account = service.create_account(test_request()).await.unwrap();

        let verified = service
            .verify_credentials("test@bunch.io", "testpassword")
            .await
            .unwrap();
        assert_eq!(verified.map(|a| a.id), Some(account.id));
        assert!(service
            .verify_credentials("test@bunch.io", "nope")
            .await
            .unwrap()
            .is_none());

        let deactivated = service.deactivate(account.id).await.unwrap();
        assert!(!deactivated.identity.is_active);
        assert!(service
            .verify_credentials("test@bunch.io", "testpassword")
            .await
            .unwrap()
            .is_none());
        assert_eq!(service.count_accounts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_login_and_set_password() {
        let service = create_test_service();
        let account = service.create_account(test_request()).await.unwrap();
        assert!(account.identity.last_login.is_none());

        let logged_in = service.record_login(account.id).await.unwrap();
        assert!(logged_in.identity.last_login.is_some());

        let changed = service.set_password(account.id, "newpassword").await.unwrap();
        assert!(changed.check_password("newpassword"));
        assert!(service.check_password(account.id, "newpassword").await.unwrap());
        assert!(!service.check_password(account.id, "testpassword").await.unwrap());
    }
}
