use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::Identity;

/// Hands the `Identity` attached by the access middleware to a handler.
/// Absent or malformed -> 401 (route not behind authentication, or a wiring bug).
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Identity::from_extensions(&parts.extensions)
            .cloned()
            .map_err(|err| {
                tracing::warn!(error = %err, "identity unavailable");
                AppError::Unauthorized
            })
    }
}
