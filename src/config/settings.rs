//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_PAYMONGO_API_BASE,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TENANT_EMAIL_DOMAIN,
    DEFAULT_TENANT_PASSWORD, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Unset means no user cache and no rate limiting
    pub redis_url: Option<String>,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    paymongo_secret_key: Option<String>,
    pub paymongo_api_base: String,
    pub tenant_email_domain: String,
    pub tenant_default_password: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field(
                "paymongo_secret_key",
                &self.paymongo_secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("paymongo_api_base", &self.paymongo_api_base)
            .field("tenant_email_domain", &self.tenant_email_domain)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: optional_var("REDIS_URL"),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            paymongo_secret_key: optional_var("PAYMONGO_SECRET_KEY"),
            paymongo_api_base: env::var("PAYMONGO_API_BASE")
                .unwrap_or_else(|_| DEFAULT_PAYMONGO_API_BASE.to_string()),
            tenant_email_domain: env::var("TENANT_EMAIL_DOMAIN")
                .unwrap_or_else(|_| DEFAULT_TENANT_EMAIL_DOMAIN.to_string()),
            tenant_default_password: env::var("TENANT_DEFAULT_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_TENANT_PASSWORD.to_string()),
        }
    }

    /// Build a configuration for tests and tooling without touching the environment.
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: None,
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            paymongo_secret_key: None,
            paymongo_api_base: DEFAULT_PAYMONGO_API_BASE.to_string(),
            tenant_email_domain: DEFAULT_TENANT_EMAIL_DOMAIN.to_string(),
            tenant_default_password: DEFAULT_TENANT_PASSWORD.to_string(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// PayMongo secret key, when the integration is configured.
    pub fn paymongo_secret_key(&self) -> Option<&str> {
        self.paymongo_secret_key.as_deref()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Environment value, with blank treated as unset.
fn optional_var(name: &str) -> Option<String> {
    non_blank(env::var(name).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::for_secret("super-secret-value-that-is-long-enough");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_paymongo_unconfigured_by_default() {
        let config = Config::for_secret("super-secret-value-that-is-long-enough");
        assert!(config.paymongo_secret_key().is_none());
        assert!(config.redis_url.is_none());
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(
            non_blank(Some("redis://cache:6379".into())),
            Some("redis://cache:6379".to_string())
        );
    }

    #[test]
    fn test_debug_marks_configured_redis_only() {
        let mut config = Config::for_secret("super-secret-value-that-is-long-enough");
        assert!(format!("{:?}", config).contains("redis_url: None"));

        config.redis_url = Some("redis://:hunter2@cache:6379".into());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("redis_url: Some(\"[REDACTED]\")"));
    }
}
