//! Per-route role requirement.
//!
//! Must be layered *inside* `access::authenticate`: no identity means 401,
//! a different role means 403.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::Identity;
use crate::error::AppError;

/// Middleware state: the role a route demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredRole(&'static str);

impl RequiredRole {
    pub const fn new(role: &'static str) -> Self {
        Self(role)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

pub fn authorize(identity: Option<&Identity>, required: &str) -> Result<(), AppError> {
    let identity = identity.ok_or(AppError::Unauthorized)?;
    if identity.role() != required {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Use with `axum::middleware::from_fn_with_state(RequiredRole::new("admin"), require_role)`.
pub async fn require_role(
    State(required): State<RequiredRole>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = match Identity::from_extensions(req.extensions()) {
        Ok(identity) => Some(identity),
        Err(err) => {
            tracing::warn!(error = %err, "role guard reached without identity");
            None
        }
    };

    if let Err(err) = authorize(identity, required.as_str()) {
        tracing::warn!(
            required = required.as_str(),
            role = identity.map(Identity::role),
            "role guard rejected request"
        );
        return Err(err);
    }

    Ok(next.run(req).await)
}
