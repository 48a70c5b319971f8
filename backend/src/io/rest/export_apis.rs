//! # REST API for Data Export

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{error, info};

use crate::io::rest::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(export_data))
}

/// Everything stored for the caller as one JSON document
pub async fn export_data(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("GET /api/export - user {}", user.id);

    match state.export_service.export_user_data(&user).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => {
            error!("Failed to export data for user {}: {}", user.id, e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{body_json, setup_app};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::json;
    use shared::ExportDocument;

    #[tokio::test]
    async fn test_export_document() {
        let app = setup_app(NaiveDate::from_ymd_opt(2024, 5, 24).unwrap()).await;
        app.send(app.json("POST", "/api/attendance", json!({"date": "2024-05-06", "status": "wfh"})))
            .await;

        let response = app.send(app.get("/api/export")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let document: ExportDocument = body_json(response).await;
        assert_eq!(document.user.id, app.user_id);
        assert_eq!(document.statistics.total_logs, 1);
        assert_eq!(document.statistics.total_targets, 0);
    }

    #[tokio::test]
    async fn test_health() {
        let app = setup_app(NaiveDate::from_ymd_opt(2024, 5, 24).unwrap()).await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }
}
