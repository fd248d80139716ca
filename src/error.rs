/*
 * Responsibility
 * - Shared AppError for the whole request chain (auth / guard / service)
 * - IntoResponse impl (HTTP status / `{"error": ...}` body)
 * - RepoError is folded in by the service, never converted here directly
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Closed set of failures visible to clients.
///
/// The `Display` text is the exact `error` message sent on the wire, so it must
/// never contain storage or crypto detail.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid user id")]
    InvalidId,
    #[error("invalid user email")]
    InvalidEmail,
    #[error("invalid user name")]
    InvalidName,
    #[error("invalid request body")]
    InvalidBody,
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("user already exists")]
    UserExists,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidId
            | AppError::InvalidEmail
            | AppError::InvalidName
            | AppError::InvalidBody => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::UserExists => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
