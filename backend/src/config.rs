//! Server process configuration from environment variables.
//!
//! - `HOST`: bind address (default: 0.0.0.0)
//! - `PORT`: bind port (default: 8000)
//! - `DB_WAIT_MAX_ATTEMPTS`: readiness probes before giving up (default: 30)
//! - `DB_WAIT_INITIAL_BACKOFF_MS`: first delay between probes (default: 200)
//! - `DB_WAIT_MAX_BACKOFF_MS`: cap on the doubling delay (default: 5000)
//! - `DB_WAIT_CONNECT_TIMEOUT_MS`: per-probe TCP connect timeout (default: 2000)

use std::net::SocketAddr;

use crate::db::ReadinessPolicy;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(name, value = %raw, "ignoring unparsable environment value");
            default
        }),
        Err(_) => default,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub readiness: ReadinessPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            readiness: ReadinessPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let policy = defaults.readiness;
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port),
            readiness: ReadinessPolicy {
                max_attempts: env_parse("DB_WAIT_MAX_ATTEMPTS", policy.max_attempts),
                initial_backoff_ms: env_parse(
                    "DB_WAIT_INITIAL_BACKOFF_MS",
                    policy.initial_backoff_ms,
                ),
                max_backoff_ms: env_parse("DB_WAIT_MAX_BACKOFF_MS", policy.max_backoff_ms),
                connect_timeout_ms: env_parse(
                    "DB_WAIT_CONNECT_TIMEOUT_MS",
                    policy.connect_timeout_ms,
                ),
            },
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
