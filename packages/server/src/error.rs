//! API error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use typerace_core::domain::{StoreError, UserId, ValueObjectError};

use crate::infrastructure::dto::http::ErrorDto;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no profile recorded for {0}")]
    ProfileNotFound(UserId),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) | ApiError::ProfileNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(StoreError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(StoreError::Stale(_)) => StatusCode::PRECONDITION_FAILED,
            ApiError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request refused ({}): {}", status, self);
        }
        let body = ErrorDto {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typerace_core::domain::RoomId;

    #[test]
    fn test_store_errors_map_to_status_codes() {
        // テスト項目: StoreError が対応する HTTP ステータスに変換される
        // given (前提条件):
        let id = RoomId::parse("ABC123").unwrap();

        // when (操作) / then (期待する結果):
        assert_eq!(
            ApiError::from(StoreError::NotFound(id.clone())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::AlreadyExists(id)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Rejected("bad".to_string())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(StoreError::Stale("moved on".to_string())).status(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            ApiError::from(StoreError::Unavailable("down".to_string())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        // テスト項目: 不正なルーム ID は 400 になる
        // given (前提条件):
        let err = RoomId::parse("abc").unwrap_err();

        // when (操作):
        let api = ApiError::from(err);

        // then (期待する結果):
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
    }
}
