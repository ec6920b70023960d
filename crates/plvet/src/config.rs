use std::time::Duration;

/// Identifying agent sent with every probe request.
pub const DEFAULT_USER_AGENT: &str = concat!("plvet/", env!("CARGO_PKG_VERSION"));

/// Retry behavior for transport-level failures.
///
/// Backoff is linear: the wait after the n-th failed attempt is
/// `base_delay * n`. HTTP error statuses are never retried; statuses are
/// treated as deterministic for the same resource within a run.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts allowed per probe, including the first.
    pub max_attempts: u32,
    /// Base delay unit between attempts.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait once `failed_attempts` attempts have failed.
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        self.base_delay * failed_attempts
    }
}

/// Configurable options for individual probe requests.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Overall timeout for one HTTP request.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Window requested by the ranged-GET fallback, in bytes.
    pub range_bytes: u64,
    /// Retry policy for transport failures.
    pub retry: RetryPolicy,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            range_bytes: 1024,
            retry: RetryPolicy::default(),
        }
    }
}

/// Configurable options for a full playlist check run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub probe: ProbeConfig,
    /// Pause between consecutive entries, bounding load on checked hosts.
    pub entry_delay: Duration,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            entry_delay: Duration::from_millis(1000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_is_linear_and_deterministic() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(1000),
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(3000));
    }

    #[test]
    fn defaults_match_the_probe_protocol() {
        let config = ProbeConfig::default();
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(CheckConfig::default().entry_delay, Duration::from_millis(1000));
    }
}
