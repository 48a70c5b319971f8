//! # Attendance Period Aggregator
//!
//! Turns the attendance log of one user, the public holidays, and a date
//! range into a [`PeriodSummary`]: business days, work days, per-status
//! counts, office percentages, and a short forecast of the days that can
//! still be converted into office attendance.
//!
//! The aggregation is a pure function. It performs no I/O, keeps no state,
//! and reads "today" only from its arguments, so the server and any client
//! linking this crate always produce identical summaries for identical
//! inputs.
//!
//! ## Rules
//!
//! - Weekends never count toward anything.
//! - A reference holiday on a weekday removes that day from business days.
//! - Entries are classified through [`CLASSIFICATION`], one row per status.
//!   `in_office` and `wfh` are "actual" up to and including today and
//!   "planned" afterwards.
//! - `work_days = max(0, business_days - leave_days - exempt_days)`.
//! - Percentages are rounded half-up to one decimal and never capped.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{AttendanceStatus, LoggedDay, PublicHoliday};

/// Target used when a user has not configured one.
pub const DEFAULT_TARGET_PERCENTAGE: f64 = 50.0;

/// Rejected date range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRangeError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("invalid date: {0}")]
    Unparseable(String),
}

/// Inclusive calendar date range. Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidRangeError> {
        if end < start {
            return Err(InvalidRangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, InvalidRangeError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    /// The full calendar month `year`-`month`.
    pub fn month(year: i32, month: u32) -> Result<Self, InvalidRangeError> {
        let invalid = || InvalidRangeError::Unparseable(format!("{:04}-{:02}", year, month));
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, InvalidRangeError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| InvalidRangeError::Unparseable(value.to_string()))
}

/// Monday through Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Derived attendance figures for a date range. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Weekdays minus weekday public holidays
    pub business_days: u32,
    /// Annual plus sick leave
    pub leave_days: u32,
    pub exempt_days: u32,
    /// Denominator for both percentages
    pub work_days: u32,
    pub office_days: u32,
    pub wfh_days: u32,
    pub planned_office_days: u32,
    pub planned_wfh_days: u32,
    pub office_percentage: f64,
    /// Office percentage if every planned office day happens
    pub total_percentage: f64,
    pub target_percentage: f64,
    /// Business days after today with nothing logged
    pub future_unlogged_days: u32,
    /// Days that could still become office days
    pub future_available_days: u32,
}

/// Counter an entry contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Office,
    Wfh,
    PlannedOffice,
    PlannedWfh,
    Exempt,
    Leave,
    Ignored,
}

/// Bucket for an entry dated on/before today and for one dated after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub actual: Bucket,
    pub future: Bucket,
}

impl Classification {
    const fn fixed(bucket: Bucket) -> Self {
        Self { actual: bucket, future: bucket }
    }

    const fn split(actual: Bucket, future: Bucket) -> Self {
        Self { actual, future }
    }

    pub fn bucket_for(&self, date: NaiveDate, today: NaiveDate) -> Bucket {
        if date > today {
            self.future
        } else {
            self.actual
        }
    }
}

/// One row per status. Statuses missing from the table are ignored.
pub const CLASSIFICATION: &[(AttendanceStatus, Classification)] = &[
    (AttendanceStatus::InOffice, Classification::split(Bucket::Office, Bucket::PlannedOffice)),
    (AttendanceStatus::Wfh, Classification::split(Bucket::Wfh, Bucket::PlannedWfh)),
    (AttendanceStatus::PlannedOffice, Classification::fixed(Bucket::PlannedOffice)),
    (AttendanceStatus::PlannedWfh, Classification::fixed(Bucket::PlannedWfh)),
    (AttendanceStatus::WfhExempt, Classification::fixed(Bucket::Exempt)),
    (AttendanceStatus::AnnualLeave, Classification::fixed(Bucket::Leave)),
    (AttendanceStatus::SickLeave, Classification::fixed(Bucket::Leave)),
    (AttendanceStatus::PublicHoliday, Classification::fixed(Bucket::Ignored)),
];

/// Look up how a status is counted.
pub fn classify(status: AttendanceStatus) -> Classification {
    CLASSIFICATION
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, c)| *c)
        .unwrap_or(Classification::fixed(Bucket::Ignored))
}

#[derive(Default)]
struct Counts {
    office: u32,
    wfh: u32,
    planned_office: u32,
    planned_wfh: u32,
    exempt: u32,
    leave: u32,
}

impl Counts {
    fn add(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Office => self.office += 1,
            Bucket::Wfh => self.wfh += 1,
            Bucket::PlannedOffice => self.planned_office += 1,
            Bucket::PlannedWfh => self.planned_wfh += 1,
            Bucket::Exempt => self.exempt += 1,
            Bucket::Leave => self.leave += 1,
            Bucket::Ignored => {}
        }
    }
}

/// `numerator / denominator * 100`, rounded half-up to one decimal.
///
/// Computed in integer tenths so values such as 12.25 round the same way on
/// every platform.
pub fn percentage(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let numerator = u64::from(numerator);
    let denominator = u64::from(denominator);
    let tenths = (numerator * 2000 + denominator) / (2 * denominator);
    tenths as f64 / 10.0
}

/// Compute the summary for `range`.
///
/// `entries` may contain dates outside the range; they are skipped. When two
/// entries share a date the first one wins, so callers must supply entries
/// in a stable order. `holidays` are matched by date only.
pub fn aggregate_period<E: LoggedDay>(
    range: DateRange,
    entries: &[E],
    holidays: &[PublicHoliday],
    today: NaiveDate,
    target_percentage: f64,
) -> PeriodSummary {
    let holiday_dates: HashSet<NaiveDate> = holidays
        .iter()
        .map(|h| h.date)
        .filter(|d| range.contains(*d) && is_weekday(*d))
        .collect();

    let business_dates: Vec<NaiveDate> = range
        .days()
        .filter(|d| is_weekday(*d) && !holiday_dates.contains(d))
        .collect();

    let mut logged: HashMap<NaiveDate, AttendanceStatus> = HashMap::new();
    for entry in entries.iter().filter(|e| range.contains(e.date())) {
        logged.entry(entry.date()).or_insert_with(|| entry.status());
    }

    let mut counts = Counts::default();
    for (date, status) in &logged {
        counts.add(classify(*status).bucket_for(*date, today));
    }

    let business_days = business_dates.len() as u32;
    let work_days = business_days.saturating_sub(counts.leave + counts.exempt);

    let future_unlogged_days = business_dates
        .iter()
        .filter(|d| **d > today && !logged.contains_key(d))
        .count() as u32;

    PeriodSummary {
        period_start: range.start(),
        period_end: range.end(),
        business_days,
        leave_days: counts.leave,
        exempt_days: counts.exempt,
        work_days,
        office_days: counts.office,
        wfh_days: counts.wfh,
        planned_office_days: counts.planned_office,
        planned_wfh_days: counts.planned_wfh,
        office_percentage: percentage(counts.office, work_days),
        total_percentage: percentage(counts.office + counts.planned_office, work_days),
        target_percentage,
        future_unlogged_days,
        future_available_days: future_unlogged_days + counts.planned_wfh,
    }
}
