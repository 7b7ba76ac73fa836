//! Retry policy: transient-failure detection and linear-jitter backoff

use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;

use crate::config::ClientConfig;

/// Decides whether a failed attempt is worth repeating and how long to wait
/// before doing so
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// How many retries are allowed after the initial attempt
    pub max_retries: u32,
    /// Lower bound of one backoff step
    pub retry_wait_min: Duration,
    /// Upper bound of one backoff step
    pub retry_wait_max: Duration,
}

impl RetryPolicy {
    /// Build the policy described by a client configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_retries: config.retry_max,
            retry_wait_min: config.retry_wait_min,
            retry_wait_max: config.retry_wait_max,
        }
    }

    /// Wait time before the given retry attempt (1-based)
    ///
    /// Linear jitter: a random base in `[retry_wait_min, retry_wait_max]`
    /// multiplied by the attempt number, so the delay grows roughly linearly
    /// while spreading concurrent retriers apart. Degrades to
    /// `retry_wait_min * attempt` when the bounds collapse.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let min = self.retry_wait_min.as_millis() as u64;
        let max = self.retry_wait_max.as_millis() as u64;

        let base = if max <= min {
            min
        } else {
            rand::thread_rng().gen_range(min..=max)
        };

        Duration::from_millis(base.saturating_mul(u64::from(attempt)))
    }

    /// Whether a response status is a transient failure
    ///
    /// Retries 429 and server errors, except 501 Not Implemented which no
    /// amount of retrying will fix.
    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return true;
        }

        status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED
    }

    /// Whether a transport error is a transient failure
    ///
    /// Connection failures and timeouts may resolve on a later attempt;
    /// malformed requests and redirect loops will not.
    pub fn should_retry_error(&self, err: &reqwest::Error) -> bool {
        if err.is_builder() || err.is_redirect() {
            return false;
        }

        err.is_timeout() || err.is_connect() || err.is_request()
    }
}
