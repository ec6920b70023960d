use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ProbeConfig, RetryPolicy};
use crate::error::TransportError;

/// Liveness verdict for a single entry.
///
/// `status` is the best HTTP status received during the probe, `0` when no
/// response ever arrived. The error string of a dead entry surfaces
/// verbatim in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ProbeResult {
    /// The URL answered with a non-error status.
    Alive { status: u16 },
    /// The URL answered with an error status, or never answered at all.
    Dead { status: u16, error: String },
}

impl ProbeResult {
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive { .. })
    }

    /// HTTP status of the best response received, `0` if none ever arrived.
    pub fn status(&self) -> u16 {
        match self {
            Self::Alive { status } | Self::Dead { status, .. } => *status,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Alive { .. } => None,
            Self::Dead { error, .. } => Some(error),
        }
    }
}

/// Network primitive the prober runs on.
///
/// `head` is the cheap header-only request; `get_range` is the
/// partial-content fallback for servers that reject HEAD. Implementations
/// report the response status and fold every transport failure into
/// [`TransportError`].
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn head(&self, url: &Url) -> Result<u16, TransportError>;
    async fn get_range(&self, url: &Url) -> Result<u16, TransportError>;
}

/// reqwest-backed [`ProbeTransport`].
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
    range_bytes: u64,
}

impl HttpTransport {
    /// Build a client with the probe timeout and identifying user agent.
    /// Redirects are followed: the verdict is for the resolved endpoint.
    pub fn new(config: &ProbeConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            timeout: config.timeout,
            range_bytes: config.range_bytes,
        })
    }
}

#[async_trait]
impl ProbeTransport for HttpTransport {
    async fn head(&self, url: &Url) -> Result<u16, TransportError> {
        let response = self
            .client
            .head(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::classify(e, self.timeout))?;
        Ok(response.status().as_u16())
    }

    async fn get_range(&self, url: &Url) -> Result<u16, TransportError> {
        let mut response = self
            .client
            .get(url.clone())
            .header(header::RANGE, format!("bytes=0-{}", self.range_bytes))
            .send()
            .await
            .map_err(|e| TransportError::classify(e, self.timeout))?;
        let status = response.status().as_u16();

        // Drain at most the requested window before finishing the attempt:
        // the connection stays reusable, and a server that ignores `Range`
        // cannot stream forever.
        let mut drained = 0u64;
        while drained <= self.range_bytes {
            match response.chunk().await {
                Ok(Some(chunk)) => drained += chunk.len() as u64,
                Ok(None) | Err(_) => break,
            }
        }

        Ok(status)
    }
}

/// Outcome of one probe attempt.
///
/// Any HTTP response terminates the probe: healthy statuses succeed, error
/// statuses fail without retrying. Only transport failures feed the retry
/// loop.
enum Attempt {
    Success(u16),
    Retry(TransportError),
    Fail(u16),
}

/// Per-URL liveness prober: bounded retries over a HEAD-then-ranged-GET
/// attempt, linear backoff between attempts.
pub struct Prober<T> {
    transport: T,
    retry: RetryPolicy,
}

impl<T: ProbeTransport> Prober<T> {
    pub fn new(transport: T, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Decide liveness for one URL.
    ///
    /// Never fails past this boundary: timeouts, refused connections, and
    /// error statuses all fold into the returned [`ProbeResult`].
    pub async fn probe(&self, url: &Url) -> ProbeResult {
        let mut failed_attempts = 0;
        loop {
            match self.attempt(url).await {
                Attempt::Success(status) => return ProbeResult::Alive { status },
                Attempt::Fail(status) => {
                    return ProbeResult::Dead {
                        status,
                        error: format!("HTTP {status}"),
                    };
                }
                Attempt::Retry(err) => {
                    failed_attempts += 1;
                    if failed_attempts >= self.retry.max_attempts {
                        return ProbeResult::Dead {
                            status: 0,
                            error: err.to_string(),
                        };
                    }
                    let delay = self.retry.delay_after(failed_attempts);
                    warn!(
                        %url,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after transport failure"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One attempt: HEAD first, ranged GET within the same attempt when the
    /// server rejects HEAD. The fallback's status is the attempt's status.
    async fn attempt(&self, url: &Url) -> Attempt {
        let status = match self.transport.head(url).await {
            Ok(status) if status == StatusCode::METHOD_NOT_ALLOWED.as_u16() => {
                debug!(%url, "HEAD not supported, falling back to ranged GET");
                match self.transport.get_range(url).await {
                    Ok(fallback) => fallback,
                    Err(err) => return Attempt::Retry(err),
                }
            }
            Ok(status) => status,
            Err(err) => return Attempt::Retry(err),
        };

        debug!(%url, status, "probe attempt resolved");
        if status < 400 {
            Attempt::Success(status)
        } else {
            Attempt::Fail(status)
        }
    }
}
