//! Environment-driven server configuration.
//!
//! Everything defaults to a working local-development setup; production
//! deployments override through the environment (`.env` is loaded by the
//! binary before this runs). Only `JWT_SECRET` has no default.

use crate::auth::jwt::JwtConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address. `HOST`, default `0.0.0.0`.
    pub host: String,
    /// Bind port. `PORT`, default `3000`.
    pub port: u16,
    /// Allowed CORS origins, comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds. `REQUEST_TIMEOUT_SECS`, default `30`.
    pub request_timeout_secs: u64,
    /// Token secret and expiry settings.
    pub jwt: JwtConfig,
}

/// Read an env var, falling back to `default` when unset.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Load the configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics on unparseable numeric values and on a missing `JWT_SECRET`;
    /// misconfiguration should stop the process at startup, not surface
    /// per-request.
    pub fn from_env() -> Self {
        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");
        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
        }
    }
}
