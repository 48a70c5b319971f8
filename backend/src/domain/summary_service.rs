//! Period summaries over stored attendance.
//!
//! Loads a user's entries and the configured region's holidays for a range
//! and hands them to [`shared::aggregate_period`]. "Today" is read from the
//! clock once per summary so every day in the range is classified against
//! the same date.

use std::sync::Arc;

use shared::{aggregate_period, DateRange, PeriodSummary, User};
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::errors::DomainResult;
use crate::domain::holiday_service::HolidayService;
use crate::storage::{AttendanceStorage, DateOrder};

#[derive(Clone)]
pub struct SummaryService {
    logs: Arc<dyn AttendanceStorage>,
    holidays: HolidayService,
    clock: Arc<dyn Clock>,
}

impl SummaryService {
    pub fn new(
        logs: Arc<dyn AttendanceStorage>,
        holidays: HolidayService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            logs,
            holidays,
            clock,
        }
    }

    /// Summary measured against the user's own target percentage
    pub async fn period_summary(&self, user: &User, range: DateRange) -> DomainResult<PeriodSummary> {
        self.summarize(user.id, range, user.target_percentage).await
    }

    pub async fn monthly_summary(&self, user: &User, year: i32, month: u32) -> DomainResult<PeriodSummary> {
        let range = DateRange::month(year, month)?;
        self.period_summary(user, range).await
    }

    pub async fn summarize(
        &self,
        user_id: i64,
        range: DateRange,
        target_percentage: f64,
    ) -> DomainResult<PeriodSummary> {
        let today = self.clock.today();

        let entries = self
            .logs
            .list_logs(user_id, Some(range.start()), Some(range.end()), DateOrder::Ascending)
            .await?;
        let holidays = self.holidays.holidays_in_range(range).await?;

        debug!(
            "Summarizing {} entries and {} holidays for user {} ({} to {})",
            entries.len(),
            holidays.len(),
            user_id,
            range.start(),
            range.end()
        );

        Ok(aggregate_period(range, &entries, &holidays, today, target_percentage))
    }
}
