/*
 * Responsibility
 * - The verified caller as seen by handlers / services (`Identity`)
 * - Write-once attachment to request extensions, and read-back
 *
 * Notes
 * - Token verification is middleware/services territory; this file is only the contract
 * - Lives in the request's own extensions, so two requests can never see each other's Identity
 */
use axum::http::Extensions;
use thiserror::Error;

use crate::services::auth::Claims;

/// Authenticated subject + role for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    subject: String,
    role: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Route is not behind authentication (or the middleware is missing).
    #[error("no identity attached to request")]
    Missing,
    /// Attached, but subject or role is blank.
    #[error("identity attached with blank subject or role")]
    Malformed,
    #[error("identity already attached to request")]
    AlreadyAttached,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    fn is_well_formed(&self) -> bool {
        !self.subject.trim().is_empty() && !self.role.trim().is_empty()
    }

    /// Store this identity on the request. Only the first attach succeeds.
    pub fn attach(self, extensions: &mut Extensions) -> Result<(), IdentityError> {
        if extensions.get::<Identity>().is_some() {
            return Err(IdentityError::AlreadyAttached);
        }
        extensions.insert(self);
        Ok(())
    }

    pub fn from_extensions(extensions: &Extensions) -> Result<&Identity, IdentityError> {
        let identity = extensions
            .get::<Identity>()
            .ok_or(IdentityError::Missing)?;
        if !identity.is_well_formed() {
            return Err(IdentityError::Malformed);
        }
        Ok(identity)
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self::new(claims.subject, claims.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_then_read() {
        let mut ext = Extensions::new();
        Identity::new("u-1", "admin").attach(&mut ext).unwrap();

        let identity = Identity::from_extensions(&ext).unwrap();
        assert_eq!(identity.subject(), "u-1");
        assert_eq!(identity.role(), "admin");
    }

    #[test]
    fn attach_is_write_once() {
        let mut ext = Extensions::new();
        Identity::new("u-1", "customer").attach(&mut ext).unwrap();

        let err = Identity::new("u-2", "admin").attach(&mut ext).unwrap_err();
        assert_eq!(err, IdentityError::AlreadyAttached);
        assert_eq!(Identity::from_extensions(&ext).unwrap().subject(), "u-1");
    }

    #[test]
    fn missing_and_malformed_are_distinct() {
        let ext = Extensions::new();
        assert_eq!(
            Identity::from_extensions(&ext).unwrap_err(),
            IdentityError::Missing
        );

        let mut ext = Extensions::new();
        Identity::new("u-1", " ").attach(&mut ext).unwrap();
        assert_eq!(
            Identity::from_extensions(&ext).unwrap_err(),
            IdentityError::Malformed
        );
    }

    #[test]
    fn built_from_claims() {
        let identity = Identity::from(Claims {
            subject: "u-9".into(),
            role: "customer".into(),
        });
        assert_eq!(identity, Identity::new("u-9", "customer"));
    }
}
