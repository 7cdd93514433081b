//! Single-attempt error type.

/// Why one GET attempt failed. Every variant is retried.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Any other transport failure (used by non-curl transports).
    #[error("{0}")]
    Transport(String),
}
