use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::DomainError;

/// JSON error body with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::InvalidRange(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // Storage details stay in the log
            DomainError::Storage(e) => {
                error!("Storage failure: {:?}", e);
                error_response(status, "Internal server error")
            }
            other => error_response(status, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_status_mapping_and_body() {
        let response = DomainError::conflict("Attendance already logged for 2024-05-02").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Attendance already logged for 2024-05-02");
    }

    #[tokio::test]
    async fn test_storage_errors_are_opaque() {
        let response = DomainError::Storage(anyhow::anyhow!("disk I/O error")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Internal server error");
    }

    #[test]
    fn test_validation_is_bad_request() {
        assert_eq!(DomainError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(DomainError::not_found("x").status_code(), StatusCode::NOT_FOUND);
    }
}
