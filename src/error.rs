use thiserror::Error;

pub type Result<T> = std::result::Result<T, StartpageError>;

#[derive(Debug, Error)]
pub enum StartpageError {
    /// The caller asked for something that can never succeed, e.g. a blank query.
    /// No request is sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, DNS or timeout failure.
    #[error("network error: {0}")]
    Network(String),

    #[error("request failed: {0}")]
    Transport(String),

    /// The page could not be interpreted at all. Carries a description of the
    /// cause, never the page itself.
    #[error("parse error: {0}")]
    Parse(String),
}

impl StartpageError {
    /// Whether a caller-side retry (after backing off) has a chance of succeeding.
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited(_) => Some(429),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
