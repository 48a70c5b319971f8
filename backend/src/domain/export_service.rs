use std::sync::Arc;

use shared::{ExportDocument, ExportStatistics, User};
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::errors::DomainResult;
use crate::domain::holiday_service::HolidayService;
use crate::storage::{AttendanceStorage, DateOrder, TargetStorage};

/// Builds a full JSON export of one user's data
#[derive(Clone)]
pub struct ExportService {
    logs: Arc<dyn AttendanceStorage>,
    targets: Arc<dyn TargetStorage>,
    holidays: HolidayService,
    clock: Arc<dyn Clock>,
}

impl ExportService {
    pub fn new(
        logs: Arc<dyn AttendanceStorage>,
        targets: Arc<dyn TargetStorage>,
        holidays: HolidayService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            logs,
            targets,
            holidays,
            clock,
        }
    }

    pub async fn export_user_data(&self, user: &User) -> DomainResult<ExportDocument> {
        info!("Exporting data for user {}", user.id);

        let attendance_logs = self
            .logs
            .list_logs(user.id, None, None, DateOrder::Ascending)
            .await?;
        let targets = self.targets.list_targets(user.id).await?;
        let public_holidays = self.holidays.list_holidays(None, None).await?;

        let statistics = ExportStatistics {
            total_logs: attendance_logs.len(),
            total_targets: targets.len(),
        };

        Ok(ExportDocument {
            exported_at: self.clock.now(),
            user: user.clone(),
            attendance_logs,
            targets,
            public_holidays,
            statistics,
        })
    }
}
