use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use compute::error::ComputeError;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    /// 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    /// 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    /// 404 Not Found
    #[error("{0}")]
    NotFound(String),

    /// 409 Conflict
    #[error("{0}")]
    Conflict(String),

    /// 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_json(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(db_error: DbErr) -> Self {
        error!("Database error: {}", db_error);
        ApiError::Internal("Database error".to_string())
    }
}

impl From<ComputeError> for ApiError {
    fn from(compute_error: ComputeError) -> Self {
        match compute_error {
            ComputeError::NotFound(what) => ApiError::NotFound(format!("Not found: {}", what)),
            other => {
                error!("Analysis storage error: {}", other);
                ApiError::Internal("Failed to access stored analysis".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_statuses() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT, "CONFLICT"),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_code(), status);
            assert_eq!(error.code(), code);
            let body = error.to_json();
            assert_eq!(body.error, "x");
            assert!(!body.success);
        }
    }

    #[test]
    fn test_storage_errors_hide_details() {
        let error: ApiError = ComputeError::Serialization("bad column".into()).into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!error.to_string().contains("bad column"));

        let error: ApiError = DbErr::Custom("disk full".into()).into();
        assert_eq!(error.code(), "INTERNAL_ERROR");
    }
}
