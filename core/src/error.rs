//! Error types for the attendance probe.
//!
//! # Design
//! Only failures that end a call live here. A body that is not JSON is not
//! an error (see `Body::Raw`), and a login without a session cookie is a
//! normal scenario outcome. Timeouts get their own variant so a hung server
//! is reported as such instead of as a generic transport failure.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by the request client and the scenario driver.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connection refused, reset, DNS failure or any other I/O-level failure.
    #[error("transport error: {0}")]
    Transport(#[source] Box<ureq::Error>),

    /// The server did not answer within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request descriptor is unusable (bad path, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An environment override could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<ureq::Error> for ProbeError {
    fn from(err: ureq::Error) -> Self {
        ProbeError::Transport(Box::new(err))
    }
}
