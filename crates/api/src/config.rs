use std::fmt;
use std::str::FromStr;

use bugtracker_core::listing::DEFAULT_PAGE_SIZE;

use crate::auth::jwt::JwtConfig;

/// Runtime settings, read once at startup.
///
/// Only `JWT_SECRET` has no default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Browser origins allowed by CORS (comma-separated `CORS_ORIGINS`).
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Issues per listing page (default: `10`).
    pub page_size: i64,
    /// When `true`, only admins may edit or delete issues; when `false`, an
    /// issue's author may too.
    pub issue_edit_admin_only: bool,
    /// Load the demo admin, categories and issues at startup.
    pub seed_demo_data: bool,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Read every setting from the environment.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `PAGE_SIZE`             | `10`                       |
    /// | `ISSUE_EDIT_ADMIN_ONLY` | `true`                     |
    /// | `SEED_DEMO_DATA`        | `false`                    |
    pub fn from_env() -> Self {
        let page_size: i64 = env_or("PAGE_SIZE", DEFAULT_PAGE_SIZE);
        assert!(page_size > 0, "PAGE_SIZE must be positive");

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            page_size,
            issue_edit_admin_only: env_or("ISSUE_EDIT_ADMIN_ONLY", true),
            seed_demo_data: env_or("SEED_DEMO_DATA", false),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
///
/// # Panics
///
/// When the variable is set but does not parse as `T`.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
