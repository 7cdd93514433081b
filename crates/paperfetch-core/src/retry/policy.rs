use rand::Rng;
use std::time::Duration;

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Attempt budget exhausted.
    GiveUp,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Bounded attempts with a uniformly random, non-growing backoff.
///
/// Stateless and `Copy`, so one policy is shared by every worker. Every
/// failure is retried the same way regardless of cause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). At least 1.
    pub max_attempts: u32,
    /// Lower bound of the backoff interval.
    pub min_backoff: Duration,
    /// Upper bound of the backoff interval.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_backoff: Duration::from_secs(5),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Builds a policy; `max_attempts` is raised to 1 and swapped bounds are reordered.
    pub fn new(max_attempts: u32, min_backoff: Duration, max_backoff: Duration) -> Self {
        let (min_backoff, max_backoff) = if min_backoff <= max_backoff {
            (min_backoff, max_backoff)
        } else {
            (max_backoff, min_backoff)
        };
        Self {
            max_attempts: max_attempts.max(1),
            min_backoff,
            max_backoff,
        }
    }

    /// Policy with no delay between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// Draws one backoff interval uniformly from `[min_backoff, max_backoff]`.
    pub fn backoff(&self) -> Duration {
        if self.max_backoff <= self.min_backoff {
            return self.min_backoff;
        }
        let secs = rand::thread_rng()
            .gen_range(self.min_backoff.as_secs_f64()..=self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Decide what to do after attempt number `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            RetryDecision::GiveUp
        } else {
            RetryDecision::RetryAfter(self.backoff())
        }
    }
}
