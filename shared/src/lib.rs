//! Types and calculations shared by the attendance server and its clients.
//!
//! The period aggregation lives here, and only here, so a client that wants
//! an optimistic summary before the server answers computes exactly what the
//! server will return.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod aggregator;
pub mod models;
pub mod progress;

pub use aggregator::{
    aggregate_period, classify, is_weekday, percentage, Bucket, Classification, DateRange,
    InvalidRangeError, PeriodSummary, CLASSIFICATION, DEFAULT_TARGET_PERCENTAGE,
};
pub use models::{
    AttendanceLog, AttendanceLogEntry, AttendanceSource, AttendanceStatus, LoggedDay,
    PeriodType, PublicHoliday, Target, User,
};
pub use progress::{required_office_days, target_progress, TargetProgress};

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    /// Defaults to the server's configured target when omitted
    pub target_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub target_percentage: Option<f64>,
}

/// Request to log attendance for a date that has no entry yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAttendanceRequest {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub source: AttendanceSource,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

/// Log (or overwrite) one day. The date defaults to today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickLogRequest {
    pub status: AttendanceStatus,
    pub date: Option<NaiveDate>,
}

/// Confirmed entries to save in one go, e.g. candidates produced by the
/// natural-language parser after the user accepted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAttendanceRequest {
    pub entries: Vec<CreateAttendanceRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAttendanceResponse {
    pub saved: Vec<AttendanceLog>,
    pub created: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHolidayRequest {
    pub date: NaiveDate,
    pub name: String,
    /// Defaults to the server's configured region
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedHolidaysResponse {
    pub added: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTargetRequest {
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub office_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTargetRequest {
    pub period_type: Option<PeriodType>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub office_percentage: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStatistics {
    pub total_logs: usize,
    pub total_targets: usize,
}

/// Everything stored for one user, for personal backups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub exported_at: DateTime<Utc>,
    pub user: User,
    pub attendance_logs: Vec<AttendanceLog>,
    pub targets: Vec<Target>,
    pub public_holidays: Vec<PublicHoliday>,
    pub statistics: ExportStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_attendance_source_defaults_to_manual() {
        let request: CreateAttendanceRequest =
            serde_json::from_str(r#"{"date":"2024-05-02","status":"in_office","notes":null}"#).unwrap();
        assert_eq!(request.source, AttendanceSource::Manual);
        assert_eq!(request.status, AttendanceStatus::InOffice);
    }

    #[test]
    fn test_quick_log_date_is_optional() {
        let request: QuickLogRequest = serde_json::from_str(r#"{"status":"wfh"}"#).unwrap();
        assert_eq!(request.date, None);
    }
}
