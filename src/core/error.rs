use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::modules::store::{ConstraintKind, StoreError};
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Operation {operation} timed out after {after_ms}ms")]
    Timeout {
        operation: &'static str,
        after_ms: u64,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Store(StoreError::Unavailable { .. }) | AppError::Timeout { .. }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retryable = self.is_retryable();
        let (status, message, errors) = match self {
            AppError::Store(StoreError::ConstraintViolation {
                kind,
                ref constraint,
                ref message,
            }) => {
                let status = match kind {
                    ConstraintKind::Unique => StatusCode::CONFLICT,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (
                    status,
                    message.clone(),
                    Some(vec![format!("{}: {}", kind, constraint)]),
                )
            }
            AppError::Store(StoreError::Unavailable { ref message }) => {
                tracing::error!("Storage unavailable: {}", message);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage temporarily unavailable".to_string(),
                    None,
                )
            }
            AppError::Store(StoreError::Timeout { ref message }) => {
                tracing::warn!("Statement timed out in storage: {}", message);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "Query exceeded the storage statement timeout".to_string(),
                    None,
                )
            }
            AppError::Store(StoreError::InvalidValue { ref message }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Value does not fit the stored column".to_string(),
                Some(vec![message.clone()]),
            ),
            AppError::Store(ref e @ StoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, e.to_string(), None)
            }
            AppError::Store(StoreError::Query { ref message }) => {
                tracing::error!("Storage query error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::Timeout {
                operation,
                after_ms,
            } => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("{} timed out after {}ms", operation, after_ms),
                None,
            ),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        let mut response = (status, body).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
