use std::sync::Arc;

use shared::{
    target_progress, CreateTargetRequest, DateRange, Target, TargetProgress, UpdateTargetRequest,
};
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::errors::{validate_percentage, DomainError, DomainResult};
use crate::domain::summary_service::SummaryService;
use crate::storage::{NewTarget, TargetStorage};

/// Service for office-attendance targets. A user has at most one active
/// target; creating or activating one deactivates the rest.
#[derive(Clone)]
pub struct TargetService {
    targets: Arc<dyn TargetStorage>,
    summaries: SummaryService,
    clock: Arc<dyn Clock>,
}

impl TargetService {
    pub fn new(
        targets: Arc<dyn TargetStorage>,
        summaries: SummaryService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            targets,
            summaries,
            clock,
        }
    }

    pub async fn list_targets(&self, user_id: i64) -> DomainResult<Vec<Target>> {
        Ok(self.targets.list_targets(user_id).await?)
    }

    pub async fn create_target(&self, user_id: i64, request: CreateTargetRequest) -> DomainResult<Target> {
        info!("Creating {} target for user {}", request.period_type.as_str(), user_id);
        DateRange::new(request.period_start, request.period_end)?;
        validate_percentage(request.office_percentage, "office_percentage")?;

        let target = self
            .targets
            .insert_active_target(&NewTarget {
                user_id,
                period_type: request.period_type,
                period_start: request.period_start,
                period_end: request.period_end,
                office_percentage: request.office_percentage,
                created_at: self.clock.now(),
            })
            .await?;

        info!("Created target {} for user {}", target.id, user_id);
        Ok(target)
    }

    pub async fn current_target(&self, user_id: i64) -> DomainResult<Target> {
        self.targets
            .get_active_target(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("No active target"))
    }

    pub async fn update_target(
        &self,
        user_id: i64,
        target_id: i64,
        request: UpdateTargetRequest,
    ) -> DomainResult<Target> {
        info!("Updating target {} for user {}", target_id, user_id);
        let mut target = self
            .targets
            .get_target(user_id, target_id)
            .await?
            .ok_or_else(|| not_found(target_id))?;

        if let Some(period_type) = request.period_type {
            target.period_type = period_type;
        }
        if let Some(start) = request.period_start {
            target.period_start = start;
        }
        if let Some(end) = request.period_end {
            target.period_end = end;
        }
        if let Some(pct) = request.office_percentage {
            validate_percentage(pct, "office_percentage")?;
            target.office_percentage = pct;
        }
        if let Some(active) = request.is_active {
            target.is_active = active;
        }
        DateRange::new(target.period_start, target.period_end)?;

        self.targets.update_target(&target).await?;
        Ok(target)
    }

    pub async fn delete_target(&self, user_id: i64, target_id: i64) -> DomainResult<()> {
        if !self.targets.delete_target(user_id, target_id).await? {
            return Err(not_found(target_id));
        }
        info!("Deleted target {} for user {}", target_id, user_id);
        Ok(())
    }

    /// Progress of the active target over its own period
    pub async fn progress(&self, user_id: i64) -> DomainResult<TargetProgress> {
        let target = self.current_target(user_id).await?;
        let range = DateRange::new(target.period_start, target.period_end)?;
        let summary = self
            .summaries
            .summarize(user_id, range, target.office_percentage)
            .await?;
        Ok(target_progress(&target, &summary))
    }
}

fn not_found(target_id: i64) -> DomainError {
    DomainError::not_found(format!("Target {} not found", target_id))
}
