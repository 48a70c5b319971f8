//! Attendance entities shared by the server and its clients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recorded status for a single calendar day.
///
/// The set is closed, but values written by a newer client are tolerated:
/// any string that does not name a known status deserializes as
/// [`AttendanceStatus::Unrecognized`] and is ignored by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    InOffice,
    Wfh,
    WfhExempt,
    AnnualLeave,
    SickLeave,
    #[serde(alias = "holiday")]
    PublicHoliday,
    PlannedOffice,
    PlannedWfh,
    #[serde(other)]
    Unrecognized,
}

impl AttendanceStatus {
    /// Every status a user can log.
    pub const ALL: [AttendanceStatus; 8] = [
        AttendanceStatus::InOffice,
        AttendanceStatus::Wfh,
        AttendanceStatus::WfhExempt,
        AttendanceStatus::AnnualLeave,
        AttendanceStatus::SickLeave,
        AttendanceStatus::PublicHoliday,
        AttendanceStatus::PlannedOffice,
        AttendanceStatus::PlannedWfh,
    ];

    /// Storage and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::InOffice => "in_office",
            AttendanceStatus::Wfh => "wfh",
            AttendanceStatus::WfhExempt => "wfh_exempt",
            AttendanceStatus::AnnualLeave => "annual_leave",
            AttendanceStatus::SickLeave => "sick_leave",
            AttendanceStatus::PublicHoliday => "public_holiday",
            AttendanceStatus::PlannedOffice => "planned_office",
            AttendanceStatus::PlannedWfh => "planned_wfh",
            AttendanceStatus::Unrecognized => "unrecognized",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, AttendanceStatus::Unrecognized)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = std::convert::Infallible;

    /// Never fails: unknown values map to `Unrecognized`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "in_office" => AttendanceStatus::InOffice,
            "wfh" => AttendanceStatus::Wfh,
            "wfh_exempt" => AttendanceStatus::WfhExempt,
            "annual_leave" => AttendanceStatus::AnnualLeave,
            "sick_leave" => AttendanceStatus::SickLeave,
            "public_holiday" | "holiday" => AttendanceStatus::PublicHoliday,
            "planned_office" => AttendanceStatus::PlannedOffice,
            "planned_wfh" => AttendanceStatus::PlannedWfh,
            _ => AttendanceStatus::Unrecognized,
        };
        Ok(status)
    }
}

/// Where a log entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceSource {
    #[default]
    Manual,
    CalendarSync,
    AiNlp,
}

impl AttendanceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceSource::Manual => "manual",
            AttendanceSource::CalendarSync => "calendar_sync",
            AttendanceSource::AiNlp => "ai_nlp",
        }
    }
}

impl FromStr for AttendanceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(AttendanceSource::Manual),
            "calendar_sync" => Ok(AttendanceSource::CalendarSync),
            "ai_nlp" => Ok(AttendanceSource::AiNlp),
            other => Err(format!("Unknown attendance source: {}", other)),
        }
    }
}

/// Anything the aggregator can treat as one logged day.
pub trait LoggedDay {
    fn date(&self) -> NaiveDate;
    fn status(&self) -> AttendanceStatus;
}

/// One user's status for one date, as consumed by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceLogEntry {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceLogEntry {
    pub fn new(date: NaiveDate, status: AttendanceStatus) -> Self {
        Self { date, status }
    }
}

impl LoggedDay for AttendanceLogEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn status(&self) -> AttendanceStatus {
        self.status
    }
}

/// A persisted attendance log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceLog {
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub source: AttendanceSource,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoggedDay for AttendanceLog {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn status(&self) -> AttendanceStatus {
        self.status
    }
}

/// A public holiday for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub region: String,
}

/// Length of the period a target applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
            PeriodType::Quarterly => "quarterly",
            PeriodType::Yearly => "yearly",
        }
    }
}

impl FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(PeriodType::Weekly),
            "monthly" => Ok(PeriodType::Monthly),
            "quarterly" => Ok(PeriodType::Quarterly),
            "yearly" => Ok(PeriodType::Yearly),
            other => Err(format!("Unknown period type: {}", other)),
        }
    }
}

/// An office-attendance target over a fixed period. At most one target per
/// user is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub user_id: i64,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Required office percentage (0-100)
    pub office_percentage: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A user of the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    /// Office percentage the user aims for, used by period summaries
    pub target_percentage: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_form() {
        for status in AttendanceStatus::ALL {
            let parsed: AttendanceStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_legacy_holiday_value_is_public_holiday() {
        let status: AttendanceStatus = serde_json::from_str("\"holiday\"").unwrap();
        assert_eq!(status, AttendanceStatus::PublicHoliday);
        assert_eq!("holiday".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::PublicHoliday);
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: AttendanceStatus = serde_json::from_str("\"half_day_office\"").unwrap();
        assert_eq!(status, AttendanceStatus::Unrecognized);
        assert!(!status.is_recognized());

        let entry: AttendanceLogEntry =
            serde_json::from_str(r#"{"date":"2024-05-02","status":"compressed_week"}"#).unwrap();
        assert_eq!(entry.status, AttendanceStatus::Unrecognized);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AttendanceStatus::WfhExempt).unwrap();
        assert_eq!(json, "\"wfh_exempt\"");
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!("ai_nlp".parse::<AttendanceSource>().unwrap(), AttendanceSource::AiNlp);
        assert!("fax".parse::<AttendanceSource>().is_err());
        assert_eq!(AttendanceSource::default(), AttendanceSource::Manual);
    }
}
