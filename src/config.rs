/*
 * Responsibility
 * - Read settings from the environment (`.env` via dotenvy)
 * - Validate them; anything missing or unparsable aborts startup
 */
use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Prefix that selects the in-memory user store instead of PostgreSQL.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub request_timeout_seconds: u64,
    pub shutdown_timeout_seconds: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // jwt_secret and database credentials stay out of logs
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("uses_memory_store", &self.uses_memory_store())
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("shutdown_timeout_seconds", &self.shutdown_timeout_seconds)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key -> value source. `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_or(lookup("PORT"), "PORT", 3000)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let database_url =
            non_empty(lookup("DATABASE_URL")).ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections =
            parse_or(lookup("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 10)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        let jwt_secret = match lookup("JWT_SECRET") {
            None => return Err(ConfigError::Missing("JWT_SECRET")),
            Some(s) if s.is_empty() => return Err(ConfigError::Invalid("JWT_SECRET")),
            Some(s) => s,
        };

        let access_token_leeway_seconds = parse_or(
            lookup("ACCESS_TOKEN_LEEWAY_SECONDS"),
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            0,
        )?;
        let request_timeout_seconds =
            parse_or(lookup("REQUEST_TIMEOUT_SECONDS"), "REQUEST_TIMEOUT_SECONDS", 30)?;
        let shutdown_timeout_seconds =
            parse_or(lookup("SHUTDOWN_TIMEOUT_SECONDS"), "SHUTDOWN_TIMEOUT_SECONDS", 5)?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_issuer: non_empty(lookup("JWT_ISSUER")),
            jwt_audience: non_empty(lookup("JWT_AUDIENCE")),
            access_token_leeway_seconds,
            request_timeout_seconds,
            shutdown_timeout_seconds,
            cors_allowed_origins,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_DATABASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [("DATABASE_URL", "memory://"), ("JWT_SECRET", "s3cret")];

    #[test]
    fn defaults_apply() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.access_token_leeway_seconds, 0);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.shutdown_timeout_seconds, 5);
        assert_eq!(config.jwt_issuer, None);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.uses_memory_store());
    }

    #[test]
    fn required_keys() {
        assert_eq!(
            load(&[("JWT_SECRET", "s")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        assert_eq!(
            load(&[("DATABASE_URL", "memory://")]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            load(&[("DATABASE_URL", "memory://"), ("JWT_SECRET", "")]).unwrap_err(),
            ConfigError::Invalid("JWT_SECRET")
        );
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Invalid("PORT"));
    }

    #[test]
    fn reads_optional_values() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("APP_ENV", "PROD"),
            ("JWT_ISSUER", "https://issuer.example"),
            ("JWT_AUDIENCE", " "),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ]);
        let config = load(&vars).unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(config.jwt_issuer.as_deref(), Some("https://issuer.example"));
        assert_eq!(config.jwt_audience, None);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn debug_hides_secret() {
        let config = load(&REQUIRED).unwrap();
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
