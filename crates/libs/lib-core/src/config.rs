//! # Application Configuration
//!
//! Configuration loaded from environment variables and validated on startup
//! to fail fast if misconfigured.
//!
//! ## Global Config Access
//!
//! Handlers receive an explicit [`Config`] through application state.
//! Middleware, which has no state of its own, uses the global accessor
//! [`core_config()`] after a single [`init_config()`] call at startup.

use lib_utils::envs::{get_env, get_env_or, get_env_parse_or};
use std::sync::OnceLock;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for JWT token signing and verification.
    ///
    /// **Must be at least 32 characters long.**
    pub jwt_secret: String,

    /// JWT token validity period in hours (1-720).
    pub jwt_expiration_hours: i64,

    /// Webhook URL of the external AI worker that generates replies.
    pub worker_webhook_url: String,

    /// Shared secret for worker authentication.
    ///
    /// Sent as `X-API-KEY` on the forward call; required on the callback
    /// endpoint in the same header.
    pub worker_api_key: String,

    /// Forward-call timeout in seconds (deadline on the dispatch HTTP POST).
    pub worker_timeout_secs: u64,

    /// Password used when seeding the root admin account.
    pub root_admin_password: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/parley.db");

        let jwt_secret = get_env("JWT_SECRET").map_err(|e| e.to_string())?;

        let jwt_expiration_hours =
            get_env_parse_or("JWT_EXPIRATION_HOURS", 24).map_err(|e| e.to_string())?;

        let worker_webhook_url = get_env("WORKER_WEBHOOK_URL").map_err(|e| e.to_string())?;
        let worker_api_key = get_env("WORKER_API_KEY").map_err(|e| e.to_string())?;

        let worker_timeout_secs =
            get_env_parse_or("WORKER_TIMEOUT_SECS", 60).map_err(|e| e.to_string())?;

        // Dev-only fallback; deployments set ROOT_ADMIN_PASSWORD explicitly.
        let root_admin_password = get_env_or("ROOT_ADMIN_PASSWORD", "root-password");

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            worker_webhook_url,
            worker_api_key,
            worker_timeout_secs,
            root_admin_password,
        })
    }

    /// Validate configuration values against security and business rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".to_string());
        }

        if self.jwt_expiration_hours < 1 || self.jwt_expiration_hours > 720 {
            return Err("JWT_EXPIRATION_HOURS must be between 1 and 720 (30 days)".to_string());
        }

        if self.worker_api_key.is_empty() {
            return Err("WORKER_API_KEY must not be empty".to_string());
        }

        if self.worker_timeout_secs == 0 {
            return Err("WORKER_TIMEOUT_SECS must be at least 1".to_string());
        }

        Ok(())
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// Must be called once at application startup, before any middleware that
/// needs configuration runs.
pub fn init_config(config: Config) -> Result<(), String> {
    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}
