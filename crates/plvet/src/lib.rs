//! Playlist liveness probing engine.
//!
//! [`Prober`] decides whether a single stream URL is currently reachable via
//! a HEAD-then-ranged-GET request state machine with bounded retries.
//! [`Checker`] walks a parsed playlist strictly sequentially, rate-limited,
//! and aggregates the per-entry verdicts into a [`CheckRun`]. Probing never
//! fails past its boundary: every timeout, refused connection, and error
//! status folds into a [`ProbeResult`].

pub mod checker;
pub mod config;
pub mod error;
pub mod probe;

pub use checker::{CheckRun, CheckedEntry, Checker, ProbeUpdate};
pub use config::{CheckConfig, DEFAULT_USER_AGENT, ProbeConfig, RetryPolicy};
pub use error::TransportError;
pub use probe::{HttpTransport, ProbeResult, ProbeTransport, Prober};
