use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use shared::CreateHolidayRequest;
use tracing::{error, info};

use crate::io::rest::CurrentUser;
use crate::AppState;

/// Routes for regional public holidays
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_holidays).post(create_holiday))
        .route("/seed-vic-fy26", post(seed_vic_fy26))
        .route("/:id", delete(delete_holiday))
}

#[derive(Debug, Deserialize)]
pub struct HolidayQuery {
    pub year: Option<i32>,
    pub region: Option<String>,
}

pub async fn list_holidays(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<HolidayQuery>,
) -> impl IntoResponse {
    info!("GET /api/holidays: {:?}", query);

    match state
        .holiday_service
        .list_holidays(query.year, query.region.as_deref())
        .await
    {
        Ok(holidays) => (StatusCode::OK, Json(holidays)).into_response(),
        Err(e) => {
            error!("Failed to list holidays: {}", e);
            e.into_response()
        }
    }
}

pub async fn create_holiday(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<CreateHolidayRequest>,
) -> impl IntoResponse {
    info!("POST /api/holidays: {:?}", request);

    match state.holiday_service.create_holiday(request).await {
        Ok(holiday) => (StatusCode::CREATED, Json(holiday)).into_response(),
        Err(e) => {
            error!("Failed to create holiday: {}", e);
            e.into_response()
        }
    }
}

pub async fn delete_holiday(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(holiday_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/holidays/{}", holiday_id);

    match state.holiday_service.delete_holiday(holiday_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete holiday {}: {}", holiday_id, e);
            e.into_response()
        }
    }
}

pub async fn seed_vic_fy26(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> impl IntoResponse {
    info!("POST /api/holidays/seed-vic-fy26");

    match state.holiday_service.seed_vic_fy26().await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to seed VIC FY26 holidays: {}", e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{body_json, setup_app};
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use serde_json::json;
    use shared::{PublicHoliday, SeedHolidaysResponse};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    #[tokio::test]
    async fn test_seed_and_list() {
        let app = setup_app(today()).await;

        let response = app.send(app.json("POST", "/api/holidays/seed-vic-fy26", json!({}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let seeded: SeedHolidaysResponse = body_json(response).await;
        assert_eq!(seeded, SeedHolidaysResponse { added: 13, total: 13 });

        let response = app.send(app.get("/api/holidays?year=2025")).await;
        let holidays: Vec<PublicHoliday> = body_json(response).await;
        let names: Vec<&str> = holidays.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Friday before AFL Grand Final",
                "Melbourne Cup Day",
                "Christmas Day",
                "Boxing Day"
            ]
        );

        let response = app.send(app.get("/api/holidays?year=2026&region=NSW")).await;
        let holidays: Vec<PublicHoliday> = body_json(response).await;
        assert!(holidays.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_and_delete() {
        let app = setup_app(today()).await;
        let body = json!({"date": "2025-11-04", "name": "Melbourne Cup Day"});

        let response = app.send(app.json("POST", "/api/holidays", body.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let holiday: PublicHoliday = body_json(response).await;
        assert_eq!(holiday.region, "VIC");

        let response = app.send(app.json("POST", "/api/holidays", body)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let uri = format!("/api/holidays/{}", holiday.id);
        assert_eq!(app.send(app.delete(&uri)).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(app.send(app.delete(&uri)).await.status(), StatusCode::NOT_FOUND);
    }
}
