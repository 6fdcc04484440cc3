//! SQLite-backed account storage.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::AccountStore;
use crate::entities::{Account, Color, Identity, Profile};
use crate::types::{AccountQuery, UserError, UserResult};

const ACCOUNT_COLUMNS: &str = "id, email, username, password_hash, first_name, last_name, \
     is_active, is_staff, is_superuser, date_joined, last_login, \
     avatar, status, bio, theme_preference, color, pronoun";

/// Repository for account database operations
#[derive(Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> UserResult<Option<Account>> {
        let query_str = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = ?");

        let row = sqlx::query(&query_str)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(account_from_row).transpose()
    }
}

impl AccountStore for AccountRepository {
    async fn persist(&self, account: &Account) -> UserResult<()> {
        let identity = &account.identity;
        let profile = &account.profile;

        let query_str = format!(
            r#"
            INSERT INTO accounts ({ACCOUNT_COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                username = excluded.username,
                password_hash = excluded.password_hash,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                is_active = excluded.is_active,
                is_staff = excluded.is_staff,
                is_superuser = excluded.is_superuser,
                last_login = excluded.last_login,
                avatar = excluded.avatar,
                status = excluded.status,
                bio = excluded.bio,
                theme_preference = excluded.theme_preference,
                color = excluded.color,
                pronoun = excluded.pronoun
            "#
        );

        sqlx::query(&query_str)
            .bind(account.id.to_string())
            .bind(&identity.email)
            .bind(&identity.username)
            .bind(&identity.password_hash)
            .bind(&identity.first_name)
            .bind(&identity.last_name)
            .bind(identity.is_active)
            .bind(identity.is_staff)
            .bind(identity.is_superuser)
            .bind(identity.date_joined)
            .bind(identity.last_login)
            .bind(&profile.avatar)
            .bind(&profile.status)
            .bind(&profile.bio)
            .bind(profile.theme_preference.as_str())
            .bind(profile.color.map(|color| color.hex()))
            .bind(&profile.pronoun)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<Account>> {
        self.find_one("id", &id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<Account>> {
        self.find_one("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<Account>> {
        self.find_one("username", username).await
    }

    async fn list(&self, query: &AccountQuery) -> UserResult<Vec<Account>> {
        let mut query_str = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE 1 = 1");

        let pattern = query
            .search_term()
            .map(|term| format!("%{}%", escape_like(term)));

        if pattern.is_some() {
            query_str.push_str(
                " AND (email LIKE ?1 ESCAPE '\\' OR username LIKE ?1 ESCAPE '\\' \
                 OR first_name LIKE ?1 ESCAPE '\\' OR last_name LIKE ?1 ESCAPE '\\' \
                 OR bio LIKE ?1 ESCAPE '\\' OR status LIKE ?1 ESCAPE '\\')",
            );
        }
        if query.is_staff.is_some() {
            query_str.push_str(" AND is_staff = ?2");
        }
        if query.is_active.is_some() {
            query_str.push_str(" AND is_active = ?3");
        }
        query_str.push_str(" ORDER BY date_joined ASC, id ASC LIMIT ?4 OFFSET ?5");

        let rows = sqlx::query(&query_str)
            .bind(pattern)
            .bind(query.is_staff)
            .bind(query.is_active)
            .bind(query.limit.map(i64::from).unwrap_or(-1))
            .bind(i64::from(query.offset.unwrap_or(0)))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(account_from_row).collect()
    }

    async fn count(&self) -> UserResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn account_from_row(row: &SqliteRow) -> UserResult<Account> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| UserError::Constraint(format!("invalid account id {id:?}: {e}")))?;

    let theme: String = row.try_get("theme_preference")?;
    let color: Option<String> = row.try_get("color")?;

    Ok(Account {
        id,
        identity: Identity {
            email: row.try_get("email")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_active: row.try_get("is_active")?,
            is_staff: row.try_get("is_staff")?,
            is_superuser: row.try_get("is_superuser")?,
            date_joined: row.try_get::<DateTime<Utc>, _>("date_joined")?,
            last_login: row.try_get::<Option<DateTime<Utc>>, _>("last_login")?,
        },
        profile: Profile {
            avatar: row.try_get("avatar")?,
            status: row.try_get("status")?,
            bio: row.try_get("bio")?,
            theme_preference: theme.parse()?,
            color: color.as_deref().map(str::parse::<Color>).transpose()?,
            pronoun: row.try_get("pronoun")?,
        },
    })
}
