use super::wire::Envelope;
use super::{RemoteRequest, Transport};
use crate::error::{ContentError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "api-key";

/// How often and how patiently a call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (1-based): `base_delay * attempt`,
    /// saturating at `Duration::MAX`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Performs one logical remote call, retrying transient failures.
pub struct RequestExecutor<T: Transport> {
    transport: T,
    base_url: String,
    api_key: String,
    policy: RetryPolicy,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetches `endpoint` (path plus any query string, already composed by the
    /// caller) and returns the `data` member of the response envelope.
    pub async fn execute<D: DeserializeOwned>(&self, endpoint: &str) -> Result<D> {
        let body = self.fetch(endpoint).await?;
        let envelope: Envelope<D> = serde_json::from_str(&body).map_err(|err| {
            ContentError::MalformedResponse(format!("{}: {}", endpoint, err))
        })?;
        Ok(envelope.data)
    }

    async fn fetch(&self, endpoint: &str) -> Result<String> {
        let request = RemoteRequest {
            url: format!("{}{}", self.base_url, endpoint),
            headers: vec![(API_KEY_HEADER.to_string(), self.api_key.clone())],
        };
        let max_attempts = self.policy.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            debug!(endpoint, attempt, "remote call");
            match self.attempt(&request, endpoint).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        endpoint,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying remote call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!(endpoint, attempt, error = %err, "remote call failed");
                    return Err(err);
                }
            }
        }
    }

    async fn attempt(&self, request: &RemoteRequest, endpoint: &str) -> Result<String> {
        let response = self.transport.send(request).await?;
        match response.status {
            200..=299 => Ok(response.body),
            429 => Err(ContentError::RateLimited {
                endpoint: endpoint.to_string(),
            }),
            status => Err(ContentError::RemoteError {
                status,
                endpoint: endpoint.to_string(),
            }),
        }
    }
}
