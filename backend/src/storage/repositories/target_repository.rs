use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::{PeriodType, Target};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::traits::{NewTarget, TargetStorage};

const TARGET_COLUMNS: &str =
    "id, user_id, period_type, period_start, period_end, office_percentage, is_active, created_at";

/// SQLite repository for attendance targets
#[derive(Clone)]
pub struct TargetRepository {
    db: DbConnection,
}

impl TargetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_target(row: &SqliteRow) -> Result<Target> {
        let period_type: String = row.try_get("period_type")?;
        Ok(Target {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            period_type: period_type
                .parse::<PeriodType>()
                .map_err(anyhow::Error::msg)
                .context("Corrupt target period type")?,
            period_start: row.try_get("period_start")?,
            period_end: row.try_get("period_end")?,
            office_percentage: row.try_get("office_percentage")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl TargetStorage for TargetRepository {
    async fn insert_active_target(&self, target: &NewTarget) -> Result<Target> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("UPDATE targets SET is_active = 0 WHERE user_id = ? AND is_active = 1")
            .bind(target.user_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO targets (user_id, period_type, period_start, period_end, office_percentage, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(target.user_id)
        .bind(target.period_type.as_str())
        .bind(target.period_start)
        .bind(target.period_end)
        .bind(target.office_percentage)
        .bind(target.created_at)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(&format!("SELECT {} FROM targets WHERE id = ?", TARGET_COLUMNS))
            .bind(result.last_insert_rowid())
            .fetch_one(&mut *tx)
            .await?;
        let stored = Self::row_to_target(&row)?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn list_targets(&self, user_id: i64) -> Result<Vec<Target>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM targets WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            TARGET_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_target).collect()
    }

    async fn get_target(&self, user_id: i64, target_id: i64) -> Result<Option<Target>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM targets WHERE id = ? AND user_id = ?",
            TARGET_COLUMNS
        ))
        .bind(target_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_target).transpose()
    }

    async fn get_active_target(&self, user_id: i64) -> Result<Option<Target>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM targets WHERE user_id = ? AND is_active = 1 ORDER BY id DESC LIMIT 1",
            TARGET_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_target).transpose()
    }

    async fn update_target(&self, target: &Target) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        if target.is_active {
            sqlx::query("UPDATE targets SET is_active = 0 WHERE user_id = ? AND id != ?")
                .bind(target.user_id)
                .bind(target.id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            UPDATE targets
            SET period_type = ?, period_start = ?, period_end = ?, office_percentage = ?, is_active = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(target.period_type.as_str())
        .bind(target.period_start)
        .bind(target.period_end)
        .bind(target.office_percentage)
        .bind(target.is_active)
        .bind(target.id)
        .bind(target.user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_target(&self, user_id: i64, target_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM targets WHERE id = ? AND user_id = ?")
            .bind(target_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repositories::UserRepository;
    use crate::storage::traits::UserStorage;
    use chrono::{Duration, NaiveDate, Utc};

    async fn setup_test() -> (TargetRepository, i64) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let user = UserRepository::new(db.clone())
            .insert_user("jo@example.com", "Jo Park", 50.0, Utc::now())
            .await
            .expect("Failed to create user");
        (TargetRepository::new(db), user.id)
    }

    fn new_target(user_id: i64, month: u32, pct: f64, offset_secs: i64) -> NewTarget {
        NewTarget {
            user_id,
            period_type: PeriodType::Monthly,
            period_start: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2025, month, 28).unwrap(),
            office_percentage: pct,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn test_new_target_replaces_active_one() {
        let (repo, user_id) = setup_test().await;

        let first = repo.insert_active_target(&new_target(user_id, 7, 50.0, 0)).await.unwrap();
        let second = repo.insert_active_target(&new_target(user_id, 8, 60.0, 1)).await.unwrap();

        let active = repo.get_active_target(user_id).await.unwrap().unwrap();
        assert_eq!(active.id, second.id);

        let first = repo.get_target(user_id, first.id).await.unwrap().unwrap();
        assert!(!first.is_active);

        let all = repo.list_targets(user_id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id, "Newest target should be listed first");
    }

    #[tokio::test]
    async fn test_reactivating_target_deactivates_others() {
        let (repo, user_id) = setup_test().await;
        let mut first = repo.insert_active_target(&new_target(user_id, 7, 50.0, 0)).await.unwrap();
        let second = repo.insert_active_target(&new_target(user_id, 8, 60.0, 1)).await.unwrap();

        first.is_active = true;
        first.office_percentage = 55.0;
        repo.update_target(&first).await.unwrap();

        let active = repo.get_active_target(user_id).await.unwrap().unwrap();
        assert_eq!(active.id, first.id);
        assert_eq!(active.office_percentage, 55.0);
        let second = repo.get_target(user_id, second.id).await.unwrap().unwrap();
        assert!(!second.is_active);
    }

    #[tokio::test]
    async fn test_delete_target() {
        let (repo, user_id) = setup_test().await;
        let target = repo.insert_active_target(&new_target(user_id, 7, 50.0, 0)).await.unwrap();

        assert!(!repo.delete_target(user_id + 1, target.id).await.unwrap());
        assert!(repo.delete_target(user_id, target.id).await.unwrap());
        assert!(repo.get_active_target(user_id).await.unwrap().is_none());
    }
}
