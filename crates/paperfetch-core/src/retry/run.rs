//! Retry loop: run one attempt at a time until success, exhaustion, or cancel.

use super::classify;
use super::error::AttemptError;
use super::policy::{RetryDecision, RetryPolicy};
use crate::control::CancelToken;

/// Terminal failure of a retried operation.
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: AttemptError,
    },
    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

/// Calls `attempt_fn` with the 1-based attempt number until it succeeds or the
/// policy gives up. Sleeps the policy's backoff between attempts. No attempt is
/// started once `cancel` is set, and a pending backoff is cut short.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut attempt_fn: F,
) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Result<T, AttemptError>,
{
    let mut attempt = 1u32;
    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled {
                attempts: attempt - 1,
            });
        }
        match attempt_fn(attempt) {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::GiveUp => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    })
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        attempt,
                        kind = classify::classify(&e).as_str(),
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "attempt failed, retrying"
                    );
                    if !cancel.sleep(delay) {
                        return Err(RetryError::Cancelled { attempts: attempt });
                    }
                    attempt += 1;
                }
            },
        }
    }
}
