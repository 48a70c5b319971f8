use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    AttendanceLog, AttendanceSource, AttendanceStatus, BulkAttendanceRequest,
    BulkAttendanceResponse, CreateAttendanceRequest, DateRange, QuickLogRequest,
    UpdateAttendanceRequest,
};
use tracing::{debug, info, warn};

use crate::domain::clock::Clock;
use crate::domain::errors::{DomainError, DomainResult};
use crate::storage::{AttendanceStorage, DateOrder, NewAttendanceLog, UpsertedLog};

/// Service for logging and browsing daily attendance
#[derive(Clone)]
pub struct AttendanceService {
    logs: Arc<dyn AttendanceStorage>,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(logs: Arc<dyn AttendanceStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { logs, clock }
    }

    /// Entries for a user, newest first, optionally bounded on either side
    pub async fn list_logs(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DomainResult<Vec<AttendanceLog>> {
        if let (Some(start), Some(end)) = (start, end) {
            DateRange::new(start, end)?;
        }
        let logs = self
            .logs
            .list_logs(user_id, start, end, DateOrder::Descending)
            .await?;
        debug!("Listed {} attendance logs for user {}", logs.len(), user_id);
        Ok(logs)
    }

    /// Entries inside `range`, oldest first
    pub async fn logs_in_range(&self, user_id: i64, range: DateRange) -> DomainResult<Vec<AttendanceLog>> {
        Ok(self
            .logs
            .list_logs(user_id, Some(range.start()), Some(range.end()), DateOrder::Ascending)
            .await?)
    }

    pub async fn calendar_month(&self, user_id: i64, year: i32, month: u32) -> DomainResult<Vec<AttendanceLog>> {
        let range = DateRange::month(year, month)?;
        self.logs_in_range(user_id, range).await
    }

    pub async fn create_log(
        &self,
        user_id: i64,
        request: CreateAttendanceRequest,
    ) -> DomainResult<AttendanceLog> {
        info!("Creating attendance log for user {} on {}", user_id, request.date);
        ensure_recognized(request.status)?;

        if self.logs.get_log_for_date(user_id, request.date).await?.is_some() {
            warn!("Attendance already logged for {} by user {}", request.date, user_id);
            return Err(DomainError::conflict(format!(
                "Attendance already logged for {}",
                request.date
            )));
        }

        let log = self
            .logs
            .insert_log(&NewAttendanceLog {
                user_id,
                date: request.date,
                status: request.status,
                source: request.source,
                notes: clean_notes(request.notes),
                timestamp: self.clock.now(),
            })
            .await?;
        Ok(log)
    }

    pub async fn update_log(
        &self,
        user_id: i64,
        log_id: i64,
        request: UpdateAttendanceRequest,
    ) -> DomainResult<AttendanceLog> {
        info!("Updating attendance log {} for user {}", log_id, user_id);
        let mut log = self.owned_log(user_id, log_id).await?;

        if let Some(status) = request.status {
            ensure_recognized(status)?;
            log.status = status;
        }
        if request.notes.is_some() {
            log.notes = clean_notes(request.notes);
        }
        log.updated_at = self.clock.now();

        self.logs.update_log(&log).await?;
        Ok(log)
    }

    pub async fn delete_log(&self, user_id: i64, log_id: i64) -> DomainResult<()> {
        info!("Deleting attendance log {} for user {}", log_id, user_id);
        if !self.logs.delete_log(user_id, log_id).await? {
            return Err(not_found(log_id));
        }
        Ok(())
    }

    /// Log or overwrite a single day, today unless a date is given
    pub async fn quick_log(&self, user_id: i64, request: QuickLogRequest) -> DomainResult<UpsertedLog> {
        ensure_recognized(request.status)?;
        let date = request.date.unwrap_or_else(|| self.clock.today());
        info!("Quick log {} for user {} on {}", request.status, user_id, date);

        let mut saved = self
            .logs
            .upsert_logs(&[NewAttendanceLog {
                user_id,
                date,
                status: request.status,
                source: AttendanceSource::Manual,
                notes: None,
                timestamp: self.clock.now(),
            }])
            .await?;

        saved
            .pop()
            .ok_or_else(|| DomainError::Storage(anyhow::anyhow!("Quick log was not saved")))
    }

    /// Save confirmed parser candidates. Either every entry is written or
    /// none is.
    pub async fn bulk_log(
        &self,
        user_id: i64,
        request: BulkAttendanceRequest,
    ) -> DomainResult<BulkAttendanceResponse> {
        info!("Bulk logging {} entries for user {}", request.entries.len(), user_id);

        let now = self.clock.now();
        let mut pending = Vec::with_capacity(request.entries.len());
        for entry in request.entries {
            ensure_recognized(entry.status)?;
            pending.push(NewAttendanceLog {
                user_id,
                date: entry.date,
                status: entry.status,
                source: AttendanceSource::AiNlp,
                notes: clean_notes(entry.notes),
                timestamp: now,
            });
        }

        let results = self.logs.upsert_logs(&pending).await?;
        let created = results.iter().filter(|r| r.created).count();
        let updated = results.len() - created;

        Ok(BulkAttendanceResponse {
            saved: results.into_iter().map(|r| r.log).collect(),
            created,
            updated,
        })
    }

    async fn owned_log(&self, user_id: i64, log_id: i64) -> DomainResult<AttendanceLog> {
        self.logs
            .get_log(user_id, log_id)
            .await?
            .ok_or_else(|| not_found(log_id))
    }
}

fn not_found(log_id: i64) -> DomainError {
    DomainError::not_found(format!("Attendance log {} not found", log_id))
}

fn ensure_recognized(status: AttendanceStatus) -> DomainResult<()> {
    if !status.is_recognized() {
        return Err(DomainError::validation("Unknown attendance status"));
    }
    Ok(())
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::storage::{AttendanceRepository, DbConnection, UserRepository, UserStorage};
    use chrono::Utc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn setup_test() -> (AttendanceService, i64) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let user = UserRepository::new(db.clone())
            .insert_user("ana@example.com", "Ana Cruz", 50.0, Utc::now())
            .await
            .unwrap();
        let service = AttendanceService::new(
            Arc::new(AttendanceRepository::new(db)),
            Arc::new(FixedClock::new(d(2024, 5, 24))),
        );
        (service, user.id)
    }

    fn create(date: NaiveDate, status: AttendanceStatus) -> CreateAttendanceRequest {
        CreateAttendanceRequest {
            date,
            status,
            source: AttendanceSource::Manual,
            notes: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_conflict() {
        let (service, user_id) = setup_test().await;

        let log = service
            .create_log(user_id, create(d(2024, 5, 2), AttendanceStatus::InOffice))
            .await
            .unwrap();
        assert_eq!(log.status, AttendanceStatus::InOffice);
        assert_eq!(log.notes, None);

        let again = service
            .create_log(user_id, create(d(2024, 5, 2), AttendanceStatus::Wfh))
            .await;
        assert!(matches!(again, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creates_for_same_date_conflict() {
        let (service, user_id) = setup_test().await;

        let (a, b) = tokio::join!(
            service.create_log(user_id, create(d(2024, 5, 2), AttendanceStatus::InOffice)),
            service.create_log(user_id, create(d(2024, 5, 2), AttendanceStatus::Wfh)),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(DomainError::Conflict(_)))));
        assert_eq!(service.list_logs(user_id, None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let (service, user_id) = setup_test().await;
        let result = service
            .create_log(user_id, create(d(2024, 5, 2), AttendanceStatus::Unrecognized))
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete_require_ownership() {
        let (service, user_id) = setup_test().await;
        let log = service
            .create_log(user_id, create(d(2024, 5, 2), AttendanceStatus::Wfh))
            .await
            .unwrap();

        let updated = service
            .update_log(
                user_id,
                log.id,
                UpdateAttendanceRequest {
                    status: Some(AttendanceStatus::InOffice),
                    notes: Some("client visit".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, AttendanceStatus::InOffice);
        assert_eq!(updated.notes.as_deref(), Some("client visit"));

        let foreign = service
            .update_log(user_id + 1, log.id, UpdateAttendanceRequest::default())
            .await;
        assert!(matches!(foreign, Err(DomainError::NotFound(_))));

        assert!(matches!(
            service.delete_log(user_id + 1, log.id).await,
            Err(DomainError::NotFound(_))
        ));
        service.delete_log(user_id, log.id).await.unwrap();
        assert!(service.list_logs(user_id, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quick_log_defaults_to_today_and_overwrites() {
        let (service, user_id) = setup_test().await;

        let first = service
            .quick_log(user_id, QuickLogRequest { status: AttendanceStatus::Wfh, date: None })
            .await
            .unwrap();
        assert!(first.created);
        assert_eq!(first.log.date, d(2024, 5, 24));

        let second = service
            .quick_log(user_id, QuickLogRequest { status: AttendanceStatus::InOffice, date: None })
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.log.id, first.log.id);
        assert_eq!(second.log.status, AttendanceStatus::InOffice);
    }

    #[tokio::test]
    async fn test_bulk_log_counts_created_and_updated() {
        let (service, user_id) = setup_test().await;
        service
            .create_log(user_id, create(d(2024, 5, 6), AttendanceStatus::Wfh))
            .await
            .unwrap();

        let response = service
            .bulk_log(
                user_id,
                BulkAttendanceRequest {
                    entries: vec![
                        create(d(2024, 5, 6), AttendanceStatus::InOffice),
                        create(d(2024, 5, 7), AttendanceStatus::InOffice),
                    ],
                },
            )
            .await
            .unwrap();

        assert_eq!(response.created, 1);
        assert_eq!(response.updated, 1);
        assert!(response.saved.iter().all(|l| l.source == AttendanceSource::AiNlp));
    }

    #[tokio::test]
    async fn test_bulk_log_rejects_whole_batch_on_bad_status() {
        let (service, user_id) = setup_test().await;
        let result = service
            .bulk_log(
                user_id,
                BulkAttendanceRequest {
                    entries: vec![
                        create(d(2024, 5, 6), AttendanceStatus::InOffice),
                        create(d(2024, 5, 7), AttendanceStatus::Unrecognized),
                    ],
                },
            )
            .await;
        assert!(result.is_err());
        assert!(service.list_logs(user_id, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_order_and_bounds() {
        let (service, user_id) = setup_test().await;
        for day in [3, 1, 2] {
            service
                .create_log(user_id, create(d(2024, 5, day), AttendanceStatus::InOffice))
                .await
                .unwrap();
        }
        service
            .create_log(user_id, create(d(2024, 6, 3), AttendanceStatus::InOffice))
            .await
            .unwrap();

        let newest_first = service.list_logs(user_id, Some(d(2024, 5, 1)), Some(d(2024, 5, 31))).await.unwrap();
        let days: Vec<NaiveDate> = newest_first.iter().map(|l| l.date).collect();
        assert_eq!(days, vec![d(2024, 5, 3), d(2024, 5, 2), d(2024, 5, 1)]);

        let calendar = service.calendar_month(user_id, 2024, 5).await.unwrap();
        let days: Vec<NaiveDate> = calendar.iter().map(|l| l.date).collect();
        assert_eq!(days, vec![d(2024, 5, 1), d(2024, 5, 2), d(2024, 5, 3)]);

        let inverted = service.list_logs(user_id, Some(d(2024, 5, 31)), Some(d(2024, 5, 1))).await;
        assert!(matches!(inverted, Err(DomainError::InvalidRange(_))));
        assert!(service.calendar_month(user_id, 2024, 13).await.is_err());
    }
}
