use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 3600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "appointments.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Deadline for durable-store calls in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// Accept appointments dated in the past (default: true)
    pub allow_past_appointments: bool,
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 3600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "appointments.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `REQUEST_TIMEOUT_SECONDS` - Durable call deadline (default: 10)
    /// - `ALLOW_PAST_APPOINTMENTS` - Accept past dates (default: true)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: parse_env("CACHE_TTL_SECONDS", 3600),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", 10_000),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "appointments.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            request_timeout_seconds: parse_env("REQUEST_TIMEOUT_SECONDS", 10),
            allow_past_appointments: parse_env("ALLOW_PAST_APPOINTMENTS", true),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the durable call deadline as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
