//! Retrying request executor shared by every endpoint

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{Error, Result};
use crate::models::ErrorMsg;
use crate::retry::RetryPolicy;

/// Executes HTTP requests through the retry policy and decodes the error
/// envelope on failure responses
///
/// All three operations funnel through [`execute`](Self::execute), so every
/// endpoint gets identical resilience behavior and an identical error
/// surface.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl RequestExecutor {
    /// Create an executor from a prepared HTTP client and retry policy
    pub fn new(http: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { http, policy }
    }

    /// Execute a request and return the raw success body
    ///
    /// A fresh request is built per attempt with the JSON content type and,
    /// for POSTs, the given body. Transient failures (connection errors,
    /// timeouts, 429, most 5xx) are retried up to the policy ceiling with
    /// linear-jitter backoff; anything else fails immediately. The token is
    /// honored before the first attempt, during each in-flight attempt and
    /// during every backoff sleep.
    pub async fn execute(
        &self,
        method: Method,
        url: &Url,
        body: Option<Bytes>,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let attempts = self.policy.max_retries.saturating_add(1);

        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::select! {
                    _ = sleep(self.policy.backoff(attempt)) => {}
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                }

                debug!("retry url {} attempt {}", url.path(), attempt);
            }

            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, "application/json");
            if let Some(body) = &body {
                request = request.body(body.clone());
            }

            let outcome = tokio::select! {
                outcome = request.send() => outcome,
                _ = cancel.cancelled() => return Err(Error::Cancelled),
            };

            match outcome {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.bytes().await.map_err(|e| Error::Transport {
                            url: url.to_string(),
                            source: e,
                        });
                    }

                    if !self.policy.should_retry_status(status) {
                        return Err(self.decode_error(url, status, response).await);
                    }

                    debug!("request {} answered transient status {}", url.path(), status);
                }
                Err(e) => {
                    if !self.policy.should_retry_error(&e) {
                        return Err(Error::Transport {
                            url: url.to_string(),
                            source: e,
                        });
                    }

                    debug!("request {} failed: {}", url.path(), e);
                }
            }
        }

        warn!("giving up on {} after {} attempts", url.path(), attempts);

        Err(Error::RetriesExhausted {
            method,
            url: url.to_string(),
            attempts,
        })
    }

    /// Turn a non-retryable failure response into an error
    ///
    /// The body must be the `{"error": ...}` envelope; if it is not JSON of
    /// that shape, the decode failure is surfaced instead.
    async fn decode_error(
        &self,
        url: &Url,
        status: StatusCode,
        response: reqwest::Response,
    ) -> Error {
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return Error::Transport {
                    url: url.to_string(),
                    source: e,
                }
            }
        };

        match serde_json::from_slice::<ErrorMsg>(&body) {
            Ok(envelope) => Error::Remote {
                status: status.as_u16(),
                message: envelope.error,
            },
            Err(e) => Error::Json(e),
        }
    }
}
