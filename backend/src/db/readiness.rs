//! Startup readiness gate for the database.
//!
//! Before the repository is created the server waits until the database
//! host accepts TCP connections. The wait is bounded by a [`ReadinessPolicy`]
//! and can be cancelled through a [`CancellationToken`] (wired to
//! SIGINT/SIGTERM by the server binary).

use std::time::Duration;

use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Postgres' default port, used when the URL omits one.
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// How long and how often to probe the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            initial_backoff_ms: 200,
            max_backoff_ms: 5_000,
            connect_timeout_ms: 2_000,
        }
    }
}

impl ReadinessPolicy {
    /// Delay to sleep after failed attempt number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(32);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    #[error("invalid database url: {0}")]
    InvalidUrl(String),

    #[error("database at {addr} not reachable after {attempts} attempts: {last_error}")]
    Exhausted {
        addr: String,
        attempts: u32,
        last_error: String,
    },

    #[error("readiness wait cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

/// Extract `host:port` from a `postgres://` / `postgresql://` URL.
pub fn database_address(database_url: &str) -> Result<(String, u16), ReadinessError> {
    let url = Url::parse(database_url).map_err(|e| ReadinessError::InvalidUrl(e.to_string()))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ReadinessError::InvalidUrl(format!("no host in {}", url.scheme())))?;
    // IPv6 hosts come back bracketed; strip for socket address formatting.
    let host = host.trim_start_matches('[').trim_end_matches(']').to_string();
    Ok((host, url.port().unwrap_or(DEFAULT_POSTGRES_PORT)))
}

/// Poll `addr` until a TCP connection succeeds.
///
/// Returns the number of attempts used. Fails with
/// [`ReadinessError::Exhausted`] after `policy.max_attempts` failures, or
/// [`ReadinessError::Cancelled`] as soon as `cancel` fires.
pub async fn wait_for_tcp(
    host: &str,
    port: u16,
    policy: &ReadinessPolicy,
    cancel: &CancellationToken,
) -> Result<u32, ReadinessError> {
    let addr = format!("{host}:{port}");
    let connect_timeout = Duration::from_millis(policy.connect_timeout_ms);
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        if cancel.is_cancelled() {
            return Err(ReadinessError::Cancelled {
                attempts: attempt - 1,
            });
        }

        let probe = tokio::time::timeout(connect_timeout, TcpStream::connect((host, port)));
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ReadinessError::Cancelled { attempts: attempt });
            }
            outcome = probe => outcome,
        };

        match outcome {
            Ok(Ok(_stream)) => {
                tracing::info!(%addr, attempt, "database is accepting connections");
                return Ok(attempt);
            }
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => last_error = format!("connect timed out after {:?}", connect_timeout),
        }

        if attempt == max_attempts {
            break;
        }

        let delay = policy.delay_for_attempt(attempt);
        tracing::warn!(
            %addr,
            attempt,
            max_attempts,
            error = %last_error,
            ?delay,
            "database not ready"
        );
        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ReadinessError::Cancelled { attempts: attempt });
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }

    Err(ReadinessError::Exhausted {
        addr,
        attempts: max_attempts,
        last_error,
    })
}
