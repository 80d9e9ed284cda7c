//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `SESSION_SECRET` - Session token signing secret (min 32 chars)
//! - `ADMIN_PASSWORD` - Password expected in the `x-admin-password` header
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8080)

use secrecy::SecretString;
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: SecretString,
    pub host: String,
    pub port: u16,
    pub session_secret: SecretString,
    pub admin_password: SecretString,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_SECRET".to_string(),
                format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters"),
            ));
        }

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string())
            })?,
            None => 8080,
        };

        Ok(Self {
            database_url: SecretString::from(required("DATABASE_URL")?),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            session_secret: SecretString::from(session_secret),
            admin_password: SecretString::from(required("ADMIN_PASSWORD")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> HashMap<String, String> {
        env(&[
            ("DATABASE_URL", "postgres://localhost/storefront"),
            ("SESSION_SECRET", "k8Jq2vN5xR7tW1zB4mC6pL9sD3fH0gYa"),
            ("ADMIN_PASSWORD", "hunter2-but-longer"),
        ])
    }

    #[test]
    fn defaults_host_and_port() {
        let vars = base();
        let config = Config::from_lookup(|k| vars.get(k).cloned()).expect("config");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.database_url.expose_secret(),
            "postgres://localhost/storefront"
        );
    }

    #[test]
    fn missing_admin_password_is_reported() {
        let mut vars = base();
        vars.remove("ADMIN_PASSWORD");
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(k) if k == "ADMIN_PASSWORD"));
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let mut vars = base();
        vars.insert("SESSION_SECRET".to_string(), "short".to_string());
        assert!(matches!(
            Config::from_lookup(|k| vars.get(k).cloned()),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut vars = base();
        vars.insert("PORT".to_string(), "eighty".to_string());
        assert!(matches!(
            Config::from_lookup(|k| vars.get(k).cloned()),
            Err(ConfigError::InvalidEnvVar(k, _)) if k == "PORT"
        ));
    }
}
