//! # Storage Traits
//!
//! Abstractions the domain layer depends on. The SQLite repositories in
//! [`super::repositories`] are the only implementations today.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    AttendanceLog, AttendanceSource, AttendanceStatus, PeriodType, PublicHoliday, Target, User,
};

/// Attendance entry that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceLog {
    pub user_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub source: AttendanceSource,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Result of writing one entry with upsert semantics
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertedLog {
    pub log: AttendanceLog,
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    Ascending,
    Descending,
}

#[async_trait]
pub trait AttendanceStorage: Send + Sync {
    /// Insert a new entry. Fails if the user already has one for the date.
    async fn insert_log(&self, log: &NewAttendanceLog) -> Result<AttendanceLog>;

    async fn get_log(&self, user_id: i64, log_id: i64) -> Result<Option<AttendanceLog>>;

    async fn get_log_for_date(&self, user_id: i64, date: NaiveDate) -> Result<Option<AttendanceLog>>;

    /// Persist status, source, notes and updated_at of an existing entry
    async fn update_log(&self, log: &AttendanceLog) -> Result<()>;

    /// Returns true if the entry existed
    async fn delete_log(&self, user_id: i64, log_id: i64) -> Result<bool>;

    /// Entries for a user with optional inclusive bounds. Ties on date are
    /// impossible (one entry per date), so the order is stable.
    async fn list_logs(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        order: DateOrder,
    ) -> Result<Vec<AttendanceLog>>;

    /// Create or overwrite entries, atomically
    async fn upsert_logs(&self, logs: &[NewAttendanceLog]) -> Result<Vec<UpsertedLog>>;
}

#[async_trait]
pub trait HolidayStorage: Send + Sync {
    async fn insert_holiday(&self, date: NaiveDate, name: &str, region: &str) -> Result<PublicHoliday>;

    async fn find_holiday(&self, date: NaiveDate, region: &str) -> Result<Option<PublicHoliday>>;

    /// Holidays ordered by date
    async fn list_holidays(
        &self,
        region: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PublicHoliday>>;

    async fn delete_holiday(&self, holiday_id: i64) -> Result<bool>;
}

/// Target that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTarget {
    pub user_id: i64,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub office_percentage: f64,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait TargetStorage: Send + Sync {
    /// Store a target as the user's only active one
    async fn insert_active_target(&self, target: &NewTarget) -> Result<Target>;

    /// Newest first
    async fn list_targets(&self, user_id: i64) -> Result<Vec<Target>>;

    async fn get_target(&self, user_id: i64, target_id: i64) -> Result<Option<Target>>;

    async fn get_active_target(&self, user_id: i64) -> Result<Option<Target>>;

    /// Persist changes. Activating a target deactivates the user's others.
    async fn update_target(&self, target: &Target) -> Result<()>;

    async fn delete_target(&self, user_id: i64, target_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn insert_user(
        &self,
        email: &str,
        full_name: &str,
        target_percentage: f64,
        created_at: DateTime<Utc>,
    ) -> Result<User>;

    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn update_user(&self, user: &User) -> Result<()>;
}
