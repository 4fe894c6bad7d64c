//! # Request Errors
//!
//! Maps table-layer and auth failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::observability::Logger;
use crate::table::TableError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Auth(#[from] AuthError),

    // ==================
    // Table Errors
    // ==================
    #[error("{0}")]
    Table(#[from] TableError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Auth(auth_err) => {
                StatusCode::from_u16(auth_err.status_code()).unwrap_or(StatusCode::UNAUTHORIZED)
            }
            ApiError::Table(TableError::UnknownTable(_)) => StatusCode::NOT_FOUND,
            ApiError::Table(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            ApiError::Table(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();

        if status.is_server_error() {
            let code = match &self {
                ApiError::Table(e) => e.code(),
                _ => "CLINICDB_INTERNAL",
            };
            Logger::error(
                "REQUEST_FAILED",
                &[("code", code), ("error", error.as_str())],
            );
        }

        let body = Json(ErrorResponse {
            error,
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}
