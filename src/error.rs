use std::time::Duration;

use thiserror::Error;

/// Failures that abandon a fetch attempt.
///
/// Content-type and size rejections are not errors; they are reported as
/// [`Outcome`](crate::fetch::Outcome) values.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("no response within {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),
}

impl FetchError {
    /// True for transport and protocol failures (DNS, refused connection,
    /// timeout, non-success status).
    pub fn is_connection(&self) -> bool {
        matches!(self, FetchError::Request(_) | FetchError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
