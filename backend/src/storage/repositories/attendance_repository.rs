use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{AttendanceLog, AttendanceSource, AttendanceStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

use crate::storage::connection::DbConnection;
use crate::storage::errors::duplicate_or_storage;
use crate::storage::traits::{AttendanceStorage, DateOrder, NewAttendanceLog, UpsertedLog};

const LOG_COLUMNS: &str = "id, user_id, date, status, source, notes, created_at, updated_at";

/// SQLite repository for attendance logs
#[derive(Clone)]
pub struct AttendanceRepository {
    db: DbConnection,
}

impl AttendanceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_log(row: &SqliteRow) -> Result<AttendanceLog> {
        let status: String = row.try_get("status")?;
        let source: String = row.try_get("source")?;
        Ok(AttendanceLog {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            date: row.try_get("date")?,
            // Unknown values written by newer clients survive as Unrecognized
            status: status.parse().unwrap_or(AttendanceStatus::Unrecognized),
            source: source
                .parse::<AttendanceSource>()
                .map_err(anyhow::Error::msg)
                .context("Corrupt attendance source")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn fetch_by_id(tx: &mut Transaction<'_, Sqlite>, log_id: i64) -> Result<AttendanceLog> {
        let row = sqlx::query(&format!("SELECT {} FROM attendance_logs WHERE id = ?", LOG_COLUMNS))
            .bind(log_id)
            .fetch_one(&mut **tx)
            .await?;
        Self::row_to_log(&row)
    }
}

#[async_trait]
impl AttendanceStorage for AttendanceRepository {
    async fn insert_log(&self, log: &NewAttendanceLog) -> Result<AttendanceLog> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_logs (user_id, date, status, source, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(log.user_id)
        .bind(log.date)
        .bind(log.status.as_str())
        .bind(log.source.as_str())
        .bind(&log.notes)
        .bind(log.timestamp)
        .bind(log.timestamp)
        .execute(self.db.pool())
        .await
        .map_err(|e| duplicate_or_storage(e, &format!("Attendance already logged for {}", log.date)))?;

        let log_id = result.last_insert_rowid();
        self.get_log(log.user_id, log_id)
            .await?
            .context("Inserted attendance log could not be read back")
    }

    async fn get_log(&self, user_id: i64, log_id: i64) -> Result<Option<AttendanceLog>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM attendance_logs WHERE id = ? AND user_id = ?",
            LOG_COLUMNS
        ))
        .bind(log_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_log).transpose()
    }

    async fn get_log_for_date(&self, user_id: i64, date: NaiveDate) -> Result<Option<AttendanceLog>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM attendance_logs WHERE user_id = ? AND date = ?",
            LOG_COLUMNS
        ))
        .bind(user_id)
        .bind(date)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_log).transpose()
    }

    async fn update_log(&self, log: &AttendanceLog) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE attendance_logs
            SET status = ?, source = ?, notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(log.status.as_str())
        .bind(log.source.as_str())
        .bind(&log.notes)
        .bind(log.updated_at)
        .bind(log.id)
        .bind(log.user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_log(&self, user_id: i64, log_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM attendance_logs WHERE id = ? AND user_id = ?")
            .bind(log_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_logs(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        order: DateOrder,
    ) -> Result<Vec<AttendanceLog>> {
        let direction = match order {
            DateOrder::Ascending => "ASC",
            DateOrder::Descending => "DESC",
        };
        let sql = format!(
            r#"
            SELECT {}
            FROM attendance_logs
            WHERE user_id = ?
              AND (? IS NULL OR date >= ?)
              AND (? IS NULL OR date <= ?)
            ORDER BY date {}, id ASC
            "#,
            LOG_COLUMNS, direction
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(start)
            .bind(start)
            .bind(end)
            .bind(end)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::row_to_log).collect()
    }

    async fn upsert_logs(&self, logs: &[NewAttendanceLog]) -> Result<Vec<UpsertedLog>> {
        let mut tx = self.db.pool().begin().await?;
        let mut saved = Vec::with_capacity(logs.len());

        for log in logs {
            let existing: Option<i64> =
                sqlx::query_scalar("SELECT id FROM attendance_logs WHERE user_id = ? AND date = ?")
                    .bind(log.user_id)
                    .bind(log.date)
                    .fetch_optional(&mut *tx)
                    .await?;

            let (log_id, created) = match existing {
                Some(log_id) => {
                    sqlx::query(
                        r#"
                        UPDATE attendance_logs
                        SET status = ?, source = ?, notes = COALESCE(?, notes), updated_at = ?
                        WHERE id = ?
                        "#,
                    )
                    .bind(log.status.as_str())
                    .bind(log.source.as_str())
                    .bind(&log.notes)
                    .bind(log.timestamp)
                    .bind(log_id)
                    .execute(&mut *tx)
                    .await?;
                    (log_id, false)
                }
                None => {
                    let result = sqlx::query(
                        r#"
                        INSERT INTO attendance_logs (user_id, date, status, source, notes, created_at, updated_at)
                        VALUES (?, ?, ?, ?, ?, ?, ?)
                        "#,
                    )
                    .bind(log.user_id)
                    .bind(log.date)
                    .bind(log.status.as_str())
                    .bind(log.source.as_str())
                    .bind(&log.notes)
                    .bind(log.timestamp)
                    .bind(log.timestamp)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        duplicate_or_storage(e, &format!("Attendance already logged for {}", log.date))
                    })?;
                    (result.last_insert_rowid(), true)
                }
            };

            let stored = Self::fetch_by_id(&mut tx, log_id).await?;
            saved.push(UpsertedLog { log: stored, created });
        }

        tx.commit().await?;
        Ok(saved)
    }
}
