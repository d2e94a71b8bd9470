//! Error types for the RMM API client.

use thiserror::Error;

/// Convenience alias used across the client, token manager and paginator.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the HTTP boundary.
///
/// Callers match on the variant instead of inspecting response shapes.
/// Invalid filter input never produces an error; it only makes a
/// condition evaluate to false.
#[derive(Debug, Error)]
pub enum Error {
    /// OAuth2 password grant failed or returned no access token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network-level failure (connection refused, timeout, DNS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response, other than the single transparent 401 retry.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl Error {
    /// Returns the HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Authentication(_) => None,
        }
    }

    /// Returns `true` for a 401 response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if repeating the whole operation may succeed.
    ///
    /// Transport failures, 429 and 5xx responses are retryable; the client
    /// itself never retries them.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Authentication(_) => false,
        }
    }
}
