//! # REST API for Targets
//!
//! Office-attendance targets and progress toward the active one.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use shared::{CreateTargetRequest, UpdateTargetRequest};
use tracing::{error, info};

use crate::io::rest::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_targets).post(create_target))
        .route("/current", get(get_current_target))
        .route("/progress", get(get_progress))
        .route("/:id", put(update_target).delete(delete_target))
}

pub async fn list_targets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("GET /api/targets - user {}", user.id);

    match state.target_service.list_targets(user.id).await {
        Ok(targets) => (StatusCode::OK, Json(targets)).into_response(),
        Err(e) => {
            error!("Failed to list targets: {}", e);
            e.into_response()
        }
    }
}

pub async fn create_target(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTargetRequest>,
) -> impl IntoResponse {
    info!("POST /api/targets - user {}: {:?}", user.id, request);

    match state.target_service.create_target(user.id, request).await {
        Ok(target) => (StatusCode::CREATED, Json(target)).into_response(),
        Err(e) => {
            error!("Failed to create target: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_current_target(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("GET /api/targets/current - user {}", user.id);

    match state.target_service.current_target(user.id).await {
        Ok(target) => (StatusCode::OK, Json(target)).into_response(),
        Err(e) => {
            error!("Failed to get current target: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_target(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(target_id): Path<i64>,
    Json(request): Json<UpdateTargetRequest>,
) -> impl IntoResponse {
    info!("PUT /api/targets/{} - user {}: {:?}", target_id, user.id, request);

    match state.target_service.update_target(user.id, target_id, request).await {
        Ok(target) => (StatusCode::OK, Json(target)).into_response(),
        Err(e) => {
            error!("Failed to update target {}: {}", target_id, e);
            e.into_response()
        }
    }
}

pub async fn delete_target(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(target_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/targets/{} - user {}", target_id, user.id);

    match state.target_service.delete_target(user.id, target_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete target {}: {}", target_id, e);
            e.into_response()
        }
    }
}

pub async fn get_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("GET /api/targets/progress - user {}", user.id);

    match state.target_service.progress(user.id).await {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(e) => {
            error!("Failed to compute target progress: {}", e);
            e.into_response()
        }
    }
}
