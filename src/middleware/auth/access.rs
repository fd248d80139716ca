//! Bearer token verification -> `Identity` in request extensions.
//!
//! Order inside this middleware is fixed: extract credential, verify token,
//! attach identity. Any failure stops the request with 401 before the
//! role guard or a handler runs.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::Identity;
use crate::error::AppError;
use crate::middleware::bearer_auth::extract_bearer;
use crate::state::AppState;

/// Use with `axum::middleware::from_fn_with_state(state, authenticate)`.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match extract_bearer(req.headers().get(header::AUTHORIZATION)) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(error = %err, "bearer credential rejected");
            return Err(AppError::Unauthorized);
        }
    };

    // Signature / exp / sub / role all collapse into the same 401 for the client.
    let claims = match state.auth.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    let identity = Identity::from(claims);
    tracing::debug!(
        subject = identity.subject(),
        role = identity.role(),
        "request authenticated"
    );

    // middleware -> extractor handoff
    identity.attach(req.extensions_mut()).map_err(|err| {
        tracing::error!(error = %err, "authentication layered twice");
        AppError::Internal
    })?;

    Ok(next.run(req).await)
}
