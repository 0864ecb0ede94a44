//! Fetch error types.

use thiserror::Error;

/// Terminal outcome of a fetch that produced no usable page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Rate limited or served a bot challenge on every attempt.
    #[error(
        "blocked fetching {url} (HTTP {status}, bot challenge: {challenge}) \
         after {attempts} attempts"
    )]
    Blocked {
        url: String,
        status: u16,
        challenge: bool,
        attempts: u32,
    },
    /// The transport failed on every attempt.
    #[error("network error fetching {url} after {attempts} attempts: {message}")]
    Network {
        url: String,
        message: String,
        attempts: u32,
    },
    /// A non-success status that carries no retry signal.
    #[error("HTTP {status} fetching {url}")]
    Terminal { url: String, status: u16 },
}

impl FetchError {
    /// Whether this error came out of an exhausted retry budget.
    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, Self::Blocked { .. } | Self::Network { .. })
    }
}

/// Failure below HTTP: connect, timeout, body read.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}
