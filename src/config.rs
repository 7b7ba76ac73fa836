//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default retry ceiling for transient failures
const DEFAULT_RETRY_MAX: u32 = 5;

/// Default per-attempt connection timeout
const DEFAULT_CONN_TIMEOUT: Duration = Duration::from_secs(15);

/// Default lower bound of one linear-jitter backoff step
const DEFAULT_RETRY_WAIT_MIN: Duration = Duration::from_millis(500);

/// Default upper bound of one linear-jitter backoff step
const DEFAULT_RETRY_WAIT_MAX: Duration = Duration::from_secs(2);

/// Configuration for a LibreTranslate client
///
/// Values are read once when [`LibreTranslate::new`] runs and are frozen for
/// the lifetime of that client; build the configuration up front with the
/// `with_*` methods. None of the knobs are validated here: a zero timeout
/// or a retry ceiling of zero is accepted as-is and simply behaves that way.
///
/// [`LibreTranslate::new`]: crate::client::LibreTranslate::new
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the instance, e.g. `https://libretranslate.com`
    pub base_url: String,
    /// API key sent with translate requests; empty when the server needs none
    pub api_key: String,
    /// How many times a transient failure is retried; 0 disables retries
    pub retry_max: u32,
    /// Timeout applied to each individual attempt
    pub conn_timeout: Duration,
    /// Lower bound of one backoff step
    pub retry_wait_min: Duration,
    /// Upper bound of one backoff step
    pub retry_wait_max: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            retry_max: DEFAULT_RETRY_MAX,
            conn_timeout: DEFAULT_CONN_TIMEOUT,
            retry_wait_min: DEFAULT_RETRY_WAIT_MIN,
            retry_wait_max: DEFAULT_RETRY_WAIT_MAX,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given instance with default retry and
    /// timeout behavior
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the retry ceiling; 0 disables retries
    pub fn with_retry_max(mut self, retry_max: u32) -> Self {
        self.retry_max = retry_max;
        self
    }

    /// Set the per-attempt connection timeout
    pub fn with_conn_timeout(mut self, conn_timeout: Duration) -> Self {
        self.conn_timeout = conn_timeout;
        self
    }

    /// Set the linear-jitter backoff bounds
    pub fn with_retry_wait(mut self, min: Duration, max: Duration) -> Self {
        self.retry_wait_min = min;
        self.retry_wait_max = max;
        self
    }

    /// Load configuration from environment variables
    ///
    /// Reads `LIBRETRANSLATE_URL` (required), `LIBRETRANSLATE_API_KEY`,
    /// `LIBRETRANSLATE_RETRY_MAX` and `LIBRETRANSLATE_TIMEOUT_MS`.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("LIBRETRANSLATE_URL")
            .map_err(|_| anyhow::anyhow!("LIBRETRANSLATE_URL environment variable is required"))?;

        let api_key = std::env::var("LIBRETRANSLATE_API_KEY").unwrap_or_default();

        let retry_max = std::env::var("LIBRETRANSLATE_RETRY_MAX")
            .unwrap_or_else(|_| DEFAULT_RETRY_MAX.to_string())
            .parse::<u32>()?;

        let timeout_ms = std::env::var("LIBRETRANSLATE_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_CONN_TIMEOUT.as_millis().to_string())
            .parse::<u64>()?;

        Ok(Self {
            base_url,
            api_key,
            retry_max,
            conn_timeout: Duration::from_millis(timeout_ms),
            ..Default::default()
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("base URL is required"));
        }

        Ok(())
    }
}
