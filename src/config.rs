//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Fallback shared secret. Deployments are expected to override it.
pub const DEFAULT_SECRET_KEY: &str = "amclub123";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret expected in the `x-secret-key` header
    pub secret_key: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY")
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string());

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            secret_key,
            host,
            port,
            environment,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether the hardcoded fallback secret is in effect
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Log a warning when the fallback secret has not been overridden
    pub fn warn_if_insecure(&self) {
        if !self.uses_default_secret() {
            return;
        }
        if self.is_production() {
            tracing::error!(
                "SECRET_KEY is not set; running in production with the default secret"
            );
        } else {
            tracing::warn!(
                "SECRET_KEY is not set; using the default secret. Override it before deploying"
            );
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
