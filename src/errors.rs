use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::files::decode::DecodeError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("username already registered")]
    AlreadyExists,

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("missing credentials")]
    NoCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("file not found")]
    NotFound,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::AlreadyExists => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "username_taken",
                "username already registered".to_string(),
            ),
            AppError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "bad_request",
                reason.clone(),
            ),
            AppError::NoCredentials => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "missing_credentials",
                "not authenticated".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "invalid_credentials",
                "could not validate credentials".to_string(),
            ),
            AppError::UnsupportedFormat(ext) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "unsupported_format",
                format!("file format not supported: {}", ext),
            ),
            AppError::Decode(e) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "decode_failed",
                e.to_string(),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "invalid_request_error",
                "not_found",
                "file not found".to_string(),
            ),
            AppError::Store(e) => {
                tracing::error!("store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        let mut response = (status, body).into_response();

        // The original service advertised the bearer scheme on every 401.
        if matches!(self, AppError::NoCredentials | AppError::InvalidCredentials) {
            response.headers_mut().insert(
                "www-authenticate",
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}
