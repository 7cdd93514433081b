//! Retry and backoff policy.
//!
//! A stateless `RetryPolicy` (attempt budget plus a uniform backoff range)
//! and the loop that applies it to a single-attempt closure. Shared by every
//! download worker.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status, ErrorKind};
pub use error::AttemptError;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryError};
