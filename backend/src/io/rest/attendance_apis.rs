//! # REST API for Attendance
//!
//! Daily logs, the monthly calendar and period summaries. Every endpoint
//! acts on the caller's own entries.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{
    BulkAttendanceRequest, CreateAttendanceRequest, DateRange, InvalidRangeError,
    QuickLogRequest, UpdateAttendanceRequest,
};
use tracing::{error, info};

use crate::domain::DomainError;
use crate::io::rest::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance).post(create_attendance))
        .route("/quick", post(quick_log))
        .route("/bulk", post(bulk_log))
        .route("/calendar", get(get_calendar))
        .route("/summary", get(get_summary))
        .route("/summary/month", get(get_monthly_summary))
        .route("/:id", put(update_attendance).delete(delete_attendance))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Dates are kept as optional text so a bad or missing value is reported as
/// a range error
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SummaryQuery {
    fn range(&self) -> Result<DateRange, InvalidRangeError> {
        let start = required(self.start_date.as_deref(), "start_date")?;
        let end = required(self.end_date.as_deref(), "end_date")?;
        DateRange::parse(start, end)
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, InvalidRangeError> {
    value.ok_or_else(|| InvalidRangeError::Unparseable(format!("missing {}", name)))
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

pub async fn list_attendance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    info!("GET /api/attendance - user {}: {:?}", user.id, query);

    match state
        .attendance_service
        .list_logs(user.id, query.start_date, query.end_date)
        .await
    {
        Ok(logs) => (StatusCode::OK, Json(logs)).into_response(),
        Err(e) => {
            error!("Failed to list attendance: {}", e);
            e.into_response()
        }
    }
}

pub async fn create_attendance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateAttendanceRequest>,
) -> impl IntoResponse {
    info!("POST /api/attendance - user {}: {:?}", user.id, request);

    match state.attendance_service.create_log(user.id, request).await {
        Ok(log) => (StatusCode::CREATED, Json(log)).into_response(),
        Err(e) => {
            error!("Failed to create attendance log: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_attendance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(log_id): Path<i64>,
    Json(request): Json<UpdateAttendanceRequest>,
) -> impl IntoResponse {
    info!("PUT /api/attendance/{} - user {}: {:?}", log_id, user.id, request);

    match state.attendance_service.update_log(user.id, log_id, request).await {
        Ok(log) => (StatusCode::OK, Json(log)).into_response(),
        Err(e) => {
            error!("Failed to update attendance log {}: {}", log_id, e);
            e.into_response()
        }
    }
}

pub async fn delete_attendance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(log_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/attendance/{} - user {}", log_id, user.id);

    match state.attendance_service.delete_log(user.id, log_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete attendance log {}: {}", log_id, e);
            e.into_response()
        }
    }
}

pub async fn quick_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<QuickLogRequest>,
) -> impl IntoResponse {
    info!("POST /api/attendance/quick - user {}: {:?}", user.id, request);

    match state.attendance_service.quick_log(user.id, request).await {
        Ok(saved) => {
            let status = if saved.created { StatusCode::CREATED } else { StatusCode::OK };
            (status, Json(saved.log)).into_response()
        }
        Err(e) => {
            error!("Failed to quick log attendance: {}", e);
            e.into_response()
        }
    }
}

pub async fn bulk_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<BulkAttendanceRequest>,
) -> impl IntoResponse {
    info!("POST /api/attendance/bulk - user {}: {} entries", user.id, request.entries.len());

    match state.attendance_service.bulk_log(user.id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to save attendance batch: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_calendar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/attendance/calendar - user {}: {:?}", user.id, query);

    match state
        .attendance_service
        .calendar_month(user.id, query.year, query.month)
        .await
    {
        Ok(logs) => (StatusCode::OK, Json(logs)).into_response(),
        Err(e) => {
            error!("Failed to load calendar month: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    info!("GET /api/attendance/summary - user {}: {:?}", user.id, query);

    let range = match query.range() {
        Ok(range) => range,
        Err(e) => {
            error!("Rejected summary range: {}", e);
            return DomainError::from(e).into_response();
        }
    };

    match state.summary_service.period_summary(&user, range).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to compute summary: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_monthly_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/attendance/summary/month - user {}: {:?}", user.id, query);

    match state
        .summary_service
        .monthly_summary(&user, query.year, query.month)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to compute monthly summary: {}", e);
            e.into_response()
        }
    }
}
