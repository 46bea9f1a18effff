//! 服务错误到 JSON 错误响应的映射。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use feedback_api_types::ErrorResponse;
use feedback_core::domain::DomainError;
use tracing::error;

use crate::error::AppError;

/// API 错误类型。
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub code: &'static str,
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            status,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "a registered student is required",
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "operation failed",
        )
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(message) => ApiError::bad_request(message),
            AppError::NotFound { .. } => {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            AppError::AlreadySubmitted => {
                ApiError::new(StatusCode::CONFLICT, "ALREADY_SUBMITTED", err.to_string())
            }
            AppError::Conflict(message) => ApiError::new(StatusCode::CONFLICT, "CONFLICT", message),
            AppError::Domain(
                ref domain @ (DomainError::UnknownQuestion(_) | DomainError::ForeignOption { .. }),
            ) => ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", domain.to_string()),
            // 只有数据库中的行可能带有未知类型标签
            AppError::Domain(ref domain @ DomainError::UnknownQuestionKind(_)) => {
                error!(error = %domain, "corrupt question row");
                ApiError::internal()
            }
            AppError::Domain(domain) => ApiError::bad_request(domain.to_string()),
            AppError::Database(ref db_err) => {
                error!(error = %db_err, "database operation failed");
                ApiError::internal()
            }
            AppError::Internal(ref internal) => {
                error!(error = %format!("{internal:#}"), "request failed");
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            code: self.code.to_string(),
        });
        (self.status, body).into_response()
    }
}
