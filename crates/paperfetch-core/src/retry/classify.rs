//! Classify attempt errors for logging.
//!
//! Classification never changes the retry decision: a 404 is retried exactly
//! like a timeout. It only labels log events so a run of futile retries
//! against missing papers is easy to spot.

use super::error::AttemptError;

/// Coarse failure category of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timeout.
    Timeout,
    /// Network-level failure (connection refused/reset, DNS, empty reply).
    Connection,
    /// 4xx status; usually means the paper does not exist.
    ClientStatus(u16),
    /// 5xx status.
    ServerStatus(u16),
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connection => "connection",
            ErrorKind::ClientStatus(_) => "client_status",
            ErrorKind::ServerStatus(_) => "server_status",
            ErrorKind::Other => "other",
        }
    }
}

/// Classify an HTTP status code.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        400..=499 => ErrorKind::ClientStatus(code as u16),
        500..=599 => ErrorKind::ServerStatus(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

pub fn classify(e: &AttemptError) -> ErrorKind {
    match e {
        AttemptError::Curl(ce) => classify_curl_error(ce),
        AttemptError::Http(code) => classify_http_status(*code),
        AttemptError::Transport(_) => ErrorKind::Other,
    }
}
