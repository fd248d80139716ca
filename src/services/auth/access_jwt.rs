use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::{error::Error as StdError, fmt};

// Errors returned by access-token verification + strict claim validation.
// Callers collapse all of them into a single `Unauthorized`; the variant is for logs only.
#[derive(Debug)]
pub enum AccessJwtError {
    Jwt(jsonwebtoken::errors::Error),
    UnsupportedAlg(Algorithm),
    EmptyClaim(&'static str),
}

impl fmt::Display for AccessJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::UnsupportedAlg(alg) => write!(f, "unsupported alg {:?} for shared secret", alg),
            Self::EmptyClaim(name) => write!(f, "missing or empty '{}' claim", name),
        }
    }
}

impl StdError for AccessJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Wire shape of the claim set. `exp` / `iss` / `aud` are checked by
/// `jsonwebtoken::Validation`, so only the application claims are read here.
#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// Verified claims. Both fields are guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: String,
    pub role: String,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, AccessJwtError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AccessJwtError::EmptyClaim(name)),
    }
}

/// HMAC (HS256/384/512) access-token verifier over a shared secret.
///
/// - The algorithm comes from the token header, restricted to the HMAC family.
/// - `exp` is checked when present; `iss` / `aud` are enforced only when configured.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    issuer: Option<String>,
    audience: Option<String>,
    leeway_seconds: u64,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &[u8], leeway_seconds: u64) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            issuer: None,
            audience: None,
            leeway_seconds,
        }
    }

    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn with_audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience;
        self
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.leeway = self.leeway_seconds;

        // exp stays optional; validate_exp still rejects an expired one
        let mut required: Vec<&str> = Vec::new();
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &self.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        validation
    }

    /// Verify signature + registered claims, then require non-blank `sub` and `role`.
    ///
    /// This is the single entry-point for the authentication middleware.
    pub fn verify(&self, token: &str) -> Result<Claims, AccessJwtError> {
        let header = jsonwebtoken::decode_header(token)?;
        if !matches!(
            header.alg,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AccessJwtError::UnsupportedAlg(header.alg));
        }

        let data = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation(header.alg),
        )?;

        Ok(Claims {
            subject: required(data.claims.sub, "sub")?,
            role: required(data.claims.role, "role")?,
        })
    }
}
