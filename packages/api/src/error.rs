// ABOUTME: Application error type and its HTTP mapping
// ABOUTME: JSON envelope for /api routes, a plain HTML page for the browser routes

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tasklist_storage::StorageError;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::render;
use crate::response::{ApiResponse, ErrorDetail};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Storage error")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => AppError::NotFound,
            StorageError::EmptyText | StorageError::TextTooLong { .. } => {
                AppError::Validation(err.to_string())
            }
            other => AppError::Storage(other),
        }
    }
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub(crate) fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }

    /// Message safe to show a client. Storage details never leave the process.
    pub(crate) fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Validation failed: {}", msg),
            AppError::NotFound => "The requested item was not found".to_string(),
            AppError::Storage(_) => "Data storage error".to_string(),
        }
    }

    fn log(&self, request_id: &str) {
        match self {
            AppError::Storage(err) => {
                error!(
                    request_id = %request_id,
                    storage_error = %err,
                    "Storage system error"
                );
            }
            _ => {
                let (_, code) = self.to_status_and_code();
                info!(
                    request_id = %request_id,
                    error_code = %code,
                    error = %self,
                    "Error response"
                );
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        self.log(&request_id);

        let (status, code) = self.to_status_and_code();
        let body = ApiResponse::<()>::error(ErrorDetail {
            code: code.to_string(),
            message: self.to_user_message(),
            request_id,
        });

        (status, Json(body)).into_response()
    }
}

/// Same errors, rendered for a browser
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl From<StorageError> for PageError {
    fn from(err: StorageError) -> Self {
        PageError(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        self.0.log(&request_id);

        let (status, _) = self.0.to_status_and_code();
        let page = render::error_page(status, &self.0.to_user_message());

        (status, Html(page)).into_response()
    }
}
