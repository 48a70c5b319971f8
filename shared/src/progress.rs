//! Progress of a period summary toward an office-attendance target.

use serde::{Deserialize, Serialize};

use crate::aggregator::PeriodSummary;
use crate::models::Target;

/// How far a user is from meeting their active target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProgress {
    pub target: Target,
    pub summary: PeriodSummary,
    /// Office days the target asks for over the period's work days
    pub required_office_days: u32,
    pub days_needed_to_meet_target: u32,
    /// Days still convertible to office days
    pub days_remaining: u32,
    pub on_track: bool,
}

/// Office days required to reach `target_percentage` of `work_days`.
/// Partial days are dropped.
pub fn required_office_days(work_days: u32, target_percentage: f64) -> u32 {
    let required = f64::from(work_days) * target_percentage / 100.0;
    required.max(0.0).floor() as u32
}

/// Measure `summary` against `target`. The summary should cover the
/// target's own period.
pub fn target_progress(target: &Target, summary: &PeriodSummary) -> TargetProgress {
    let required = required_office_days(summary.work_days, target.office_percentage);
    let needed = required.saturating_sub(summary.office_days);
    let remaining = summary.future_available_days;

    TargetProgress {
        target: target.clone(),
        summary: summary.clone(),
        required_office_days: required,
        days_needed_to_meet_target: needed,
        days_remaining: remaining,
        on_track: summary.office_percentage >= target.office_percentage || needed <= remaining,
    }
}
