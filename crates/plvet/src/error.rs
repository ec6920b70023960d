use std::error::Error;
use std::io;
use std::time::Duration;

/// Transport-level probe failure: no usable HTTP response was received.
///
/// Display strings surface verbatim in dead-entry reports, so they stay
/// short and human-readable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Connection refused")]
    ConnectionRefused,

    #[error("Host not found")]
    HostNotFound,

    #[error("Connection timeout")]
    ConnectTimeout,

    #[error("Connection error: {0}")]
    Other(String),
}

impl TransportError {
    /// Fold a reqwest failure into the report taxonomy.
    ///
    /// Request-level timeouts map directly; everything else is resolved by
    /// walking the error source chain for the underlying I/O or DNS
    /// condition, since reqwest exposes no typed variants for those.
    pub fn classify(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                return Self::ConnectTimeout;
            }
            return Self::Timeout(timeout.as_millis() as u64);
        }

        let mut source = err.source();
        while let Some(cause) = source {
            if let Some(io_err) = cause.downcast_ref::<io::Error>() {
                match io_err.kind() {
                    io::ErrorKind::ConnectionRefused => return Self::ConnectionRefused,
                    io::ErrorKind::TimedOut => return Self::ConnectTimeout,
                    _ => {}
                }
            }
            let text = cause.to_string();
            if text.contains("dns error") || text.contains("failed to lookup address") {
                return Self::HostNotFound;
            }
            source = cause.source();
        }

        Self::Other(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_messages_are_fixed_strings() {
        assert_eq!(
            TransportError::Timeout(10_000).to_string(),
            "Timeout after 10000ms"
        );
        assert_eq!(
            TransportError::ConnectionRefused.to_string(),
            "Connection refused"
        );
        assert_eq!(TransportError::HostNotFound.to_string(), "Host not found");
        assert_eq!(
            TransportError::ConnectTimeout.to_string(),
            "Connection timeout"
        );
        assert_eq!(
            TransportError::Other("tls handshake failed".to_owned()).to_string(),
            "Connection error: tls handshake failed"
        );
    }
}
