use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::{info, warn};

use crate::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub session_ttl_hours: i64,
    pub auth_retry_attempts: u32,
    pub auth_retry_base_ms: u64,
    /// Email of an existing account promoted to super admin on startup.
    pub bootstrap_admin_email: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_url: try_load("DATABASE_URL", "sqlite://cleaning.db?mode=rwc"),
            host: try_load("HOST", "127.0.0.1"),
            port: try_load("PORT", "8080"),
            db_max_connections: try_load("DB_MAX_CONNECTIONS", "5"),
            session_ttl_hours: try_load("SESSION_TTL_HOURS", "168"),
            auth_retry_attempts: try_load("AUTH_RETRY_ATTEMPTS", "3"),
            auth_retry_base_ms: try_load("AUTH_RETRY_BASE_MS", "1000"),
            bootstrap_admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL")
                .ok()
                .filter(|email| !email.trim().is_empty()),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.auth_retry_attempts,
            Duration::from_millis(self.auth_retry_base_ms),
        )
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_or_default(key, &raw, default)
}

fn parse_or_default<T: FromStr>(key: &str, raw: &str, default: &str) -> T
where
    T::Err: Display,
{
    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
                .parse()
                .unwrap_or_else(|_| panic!("default for {key} must parse"))
        }
    }
}
