use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use shared::User;
use tracing::warn;

use crate::io::rest::errors::error_response;
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The active user named by the `X-User-Id` header
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                error_response(StatusCode::UNAUTHORIZED, "Missing or invalid X-User-Id header")
            })?;

        match state.user_service.find_active_user(user_id).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                warn!("Request for unknown or inactive user {}", user_id);
                Err(error_response(StatusCode::UNAUTHORIZED, "Unknown user"))
            }
            Err(e) => Err(e.into_response()),
        }
    }
}
