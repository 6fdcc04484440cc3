//! Group repository for database operations.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::entities::Group;
use crate::types::{GroupId, UserResult};

/// Repository for groups and account membership
#[derive(Clone)]
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    /// Create a new group repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a group; duplicate names fail with a uniqueness conflict
    pub async fn create(&self, name: &str) -> UserResult<Group> {
        let result = sqlx::query("INSERT INTO groups (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(Group {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn find_by_id(&self, id: GroupId) -> UserResult<Option<Group>> {
        let row = sqlx::query("SELECT id, name FROM groups WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(group_from_row).transpose()
    }

    pub async fn find_by_name(&self, name: &str) -> UserResult<Option<Group>> {
        let row = sqlx::query("SELECT id, name FROM groups WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(group_from_row).transpose()
    }

    pub async fn list(&self) -> UserResult<Vec<Group>> {
        let rows = sqlx::query("SELECT id, name FROM groups ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(group_from_row).collect()
    }

    /// Add an account to a group; adding twice is a no-op
    pub async fn add_member(&self, group_id: GroupId, account_id: Uuid) -> UserResult<()> {
        sqlx::query(
            "INSERT INTO account_groups (account_id, group_id) VALUES (?, ?) ON CONFLICT DO NOTHING",
        )
        .bind(account_id.to_string())
        .bind(group_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_member(&self, group_id: GroupId, account_id: Uuid) -> UserResult<()> {
        sqlx::query("DELETE FROM account_groups WHERE account_id = ? AND group_id = ?")
            .bind(account_id.to_string())
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Groups an account belongs to, ordered by name
    pub async fn list_for_account(&self, account_id: Uuid) -> UserResult<Vec<Group>> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.name
            FROM groups g
            JOIN account_groups ag ON ag.group_id = g.id
            WHERE ag.account_id = ?
            ORDER BY g.name
            "#,
        )
        .bind(account_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(group_from_row).collect()
    }
}

fn group_from_row(row: &SqliteRow) -> UserResult<Group> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}
