use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::PublicHoliday;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::errors::duplicate_or_storage;
use crate::storage::traits::HolidayStorage;

/// SQLite repository for public holidays
#[derive(Clone)]
pub struct HolidayRepository {
    db: DbConnection,
}

impl HolidayRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_holiday(row: &SqliteRow) -> Result<PublicHoliday> {
        Ok(PublicHoliday {
            id: row.try_get("id")?,
            date: row.try_get("date")?,
            name: row.try_get("name")?,
            region: row.try_get("region")?,
        })
    }
}

#[async_trait]
impl HolidayStorage for HolidayRepository {
    async fn insert_holiday(&self, date: NaiveDate, name: &str, region: &str) -> Result<PublicHoliday> {
        let result = sqlx::query("INSERT INTO public_holidays (date, name, region) VALUES (?, ?, ?)")
            .bind(date)
            .bind(name)
            .bind(region)
            .execute(self.db.pool())
            .await
            .map_err(|e| {
                duplicate_or_storage(e, &format!("Holiday already exists on {} for {}", date, region))
            })?;

        Ok(PublicHoliday {
            id: result.last_insert_rowid(),
            date,
            name: name.to_string(),
            region: region.to_string(),
        })
    }

    async fn find_holiday(&self, date: NaiveDate, region: &str) -> Result<Option<PublicHoliday>> {
        let row = sqlx::query(
            "SELECT id, date, name, region FROM public_holidays WHERE date = ? AND region = ?",
        )
        .bind(date)
        .bind(region)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_holiday).transpose()
    }

    async fn list_holidays(
        &self,
        region: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PublicHoliday>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, name, region
            FROM public_holidays
            WHERE (? IS NULL OR region = ?)
              AND (? IS NULL OR date >= ?)
              AND (? IS NULL OR date <= ?)
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(region)
        .bind(region)
        .bind(start)
        .bind(start)
        .bind(end)
        .bind(end)
        .fetch_all(self.db.pool())
        .await
        .context("Failed to list public holidays")?;

        rows.iter().map(Self::row_to_holiday).collect()
    }

    async fn delete_holiday(&self, holiday_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM public_holidays WHERE id = ?")
            .bind(holiday_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DuplicateEntry;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn setup_test() -> HolidayRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        HolidayRepository::new(db)
    }

    #[tokio::test]
    async fn test_insert_and_find_holiday() {
        let repo = setup_test().await;

        let stored = repo
            .insert_holiday(d(2025, 11, 4), "Melbourne Cup Day", "VIC")
            .await
            .expect("Failed to insert holiday");

        let found = repo.find_holiday(d(2025, 11, 4), "VIC").await.expect("Query failed");
        assert_eq!(found, Some(stored));
        assert!(repo.find_holiday(d(2025, 11, 4), "NSW").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_same_date_and_region_is_rejected() {
        let repo = setup_test().await;
        repo.insert_holiday(d(2025, 12, 25), "Christmas Day", "VIC").await.unwrap();

        let duplicate = repo.insert_holiday(d(2025, 12, 25), "Christmas", "VIC").await.unwrap_err();
        assert!(duplicate.downcast_ref::<DuplicateEntry>().is_some());
        assert!(repo.insert_holiday(d(2025, 12, 25), "Christmas Day", "NSW").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_filters_by_region_and_dates() {
        let repo = setup_test().await;
        repo.insert_holiday(d(2026, 1, 26), "Australia Day", "VIC").await.unwrap();
        repo.insert_holiday(d(2025, 12, 25), "Christmas Day", "VIC").await.unwrap();
        repo.insert_holiday(d(2026, 1, 1), "New Year's Day", "NSW").await.unwrap();

        let vic = repo.list_holidays(Some("VIC"), None, None).await.unwrap();
        let names: Vec<&str> = vic.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Christmas Day", "Australia Day"]);

        let january = repo
            .list_holidays(None, Some(d(2026, 1, 1)), Some(d(2026, 1, 31)))
            .await
            .unwrap();
        assert_eq!(january.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_holiday() {
        let repo = setup_test().await;
        let stored = repo.insert_holiday(d(2026, 4, 3), "Good Friday", "VIC").await.unwrap();

        assert!(repo.delete_holiday(stored.id).await.unwrap());
        assert!(!repo.delete_holiday(stored.id).await.unwrap());
    }
}
