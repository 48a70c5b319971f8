//! # REST API for Users
//!
//! Registration and the caller's own profile.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{CreateUserRequest, UpdateProfileRequest};
use tracing::{error, info};

use crate::io::rest::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/profile", get(get_profile).put(update_profile))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users - email: {}", request.email);

    match state.user_service.create_user(request).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => {
            error!("Failed to create user: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_profile(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    info!("GET /api/users/profile - user {}", user.id);
    (StatusCode::OK, Json(user))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/profile - user {}: {:?}", user.id, request);

    match state.user_service.update_profile(user.id, request).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => {
            error!("Failed to update profile for user {}: {}", user.id, e);
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
    use shared::{ErrorResponse, User};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 24).unwrap()
    }

    #[tokio::test]
    async fn test_register_user() {
        let app = setup_app(today()).await;

        let response = app
            .send(app.json(
                "POST",
                "/api/users",
                json!({"email": "new@example.com", "full_name": "New Person", "target_percentage": 40.0}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let user: User = body_json(response).await;
        assert_eq!(user.target_percentage, 40.0);

        let duplicate = app
            .send(app.json(
                "POST",
                "/api/users",
                json!({"email": "new@example.com", "full_name": "Again"}),
            ))
            .await;
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        let body: ErrorResponse = body_json(duplicate).await;
        assert_eq!(body.error, "Email already registered");
    }

    #[tokio::test]
    async fn test_update_profile() {
        let app = setup_app(today()).await;

        let response = app
            .send(app.json("PUT", "/api/users/profile", json!({"target_percentage": 70.0})))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let user: User = body_json(response).await;
        assert_eq!(user.target_percentage, 70.0);
        assert_eq!(user.email, "test@example.com");

        let invalid = app
            .send(app.json("PUT", "/api/users/profile", json!({"target_percentage": -1.0})))
            .await;
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
