use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::User;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::errors::duplicate_or_storage;
use crate::storage::traits::UserStorage;

/// Repository for user operations
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            target_percentage: row.try_get("target_percentage")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn insert_user(
        &self,
        email: &str,
        full_name: &str,
        target_percentage: f64,
        created_at: DateTime<Utc>,
    ) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, full_name, target_percentage, is_active, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(email)
        .bind(full_name)
        .bind(target_percentage)
        .bind(created_at)
        .bind(created_at)
        .execute(self.db.pool())
        .await
        .map_err(|e| duplicate_or_storage(e, "Email already registered"))?;

        self.get_user(result.last_insert_rowid())
            .await?
            .context("Inserted user could not be read back")
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, full_name, target_percentage, is_active, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, full_name, target_percentage, is_active, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET email = ?, full_name = ?, target_percentage = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.target_percentage)
        .bind(user.is_active)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(self.db.pool())
        .await
        .map_err(|e| duplicate_or_storage(e, "Email already registered"))?;
        Ok(())
    }
}
