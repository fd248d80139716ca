/*
 * Responsibility
 * - Authorization header -> bearer token (`Bearer <token>`, nothing else)
 * - Pure parsing. Verification lives in services::auth
 */
use axum::http::HeaderValue;
use thiserror::Error;

pub const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("missing authorization header")]
    Missing,
    #[error("authorization header is not visible ascii")]
    NotAscii,
    #[error("invalid authorization header format")]
    Malformed,
}

/// Split on single spaces: exactly two parts, the first being `Bearer`.
///
/// `"Bearer  abc"` (two spaces) and `"Bearer a b"` both yield three parts and
/// are rejected.
pub fn extract_bearer(value: Option<&HeaderValue>) -> Result<&str, BearerError> {
    let raw = value.ok_or(BearerError::Missing)?;
    let raw = raw.to_str().map_err(|_| BearerError::NotAscii)?;
    if raw.is_empty() {
        return Err(BearerError::Missing);
    }

    let mut parts = raw.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(BearerError::Malformed),
    }
}
