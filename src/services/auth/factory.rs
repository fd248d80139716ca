/// Factory: build `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::TokenVerifier;

pub fn build_token_verifier(config: &Config) -> Arc<TokenVerifier> {
    let verifier = TokenVerifier::new(
        config.jwt_secret.as_bytes(),
        config.access_token_leeway_seconds,
    )
    .with_issuer(config.jwt_issuer.clone())
    .with_audience(config.jwt_audience.clone());

    Arc::new(verifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("memory://".into()),
            "JWT_SECRET" => Some("factory-secret".into()),
            _ => None,
        })
        .unwrap()
    }

    fn sign(exp_offset: i64) -> String {
        let claims = json!({
            "sub": "u-1",
            "role": "admin",
            "exp": chrono::Utc::now().timestamp() + exp_offset,
        });
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"factory-secret"),
        )
        .unwrap()
    }

    #[test]
    fn default_config_has_no_expiry_grace() {
        let verifier = build_token_verifier(&config());

        assert!(verifier.verify(&sign(600)).is_ok());
        assert!(verifier.verify(&sign(-30)).is_err());
    }
}
