use std::sync::Arc;
use std::time::Duration;

use super::classify::{is_retryable, Classify, RetryableCodes};
use super::context::AttemptContext;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; the error is terminal.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy with a retry budget and a retryable-kind set.
///
/// Cloning is cheap: the retryable set is shared behind an `Arc`, so one
/// policy can back any number of concurrent runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first (total attempts = `max_retries + 1`).
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every subsequent retry.
    pub backoff_base: Duration,
    /// Upper bound on any single backoff delay.
    pub backoff_max: Duration,
    /// Error kinds that are retried. Replaces the default set entirely.
    pub retryable_codes: Arc<RetryableCodes>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_millis(1000),
            backoff_max: Duration::from_millis(8000),
            retryable_codes: Arc::new(RetryableCodes::default()),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows attempt `attempt` (0-based):
    /// `min(backoff_max, backoff_base * 2^attempt)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.backoff_base
            .saturating_mul(factor)
            .min(self.backoff_max)
    }

    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_max = max;
        self
    }

    pub fn with_retryable_codes(mut self, codes: impl Into<Arc<RetryableCodes>>) -> Self {
        self.retryable_codes = codes.into();
        self
    }
}

/// Retry setting for one call: either disabled outright or governed by a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retry {
    /// Never retry, whatever the error kind or budget.
    Disabled,
    Enabled(RetryPolicy),
}

impl Default for Retry {
    fn default() -> Self {
        Retry::Enabled(RetryPolicy::default())
    }
}

impl From<RetryPolicy> for Retry {
    fn from(policy: RetryPolicy) -> Self {
        Retry::Enabled(policy)
    }
}

impl Retry {
    pub fn policy(&self) -> Option<&RetryPolicy> {
        match self {
            Retry::Disabled => None,
            Retry::Enabled(p) => Some(p),
        }
    }

    /// Decide what follows a failed attempt.
    ///
    /// Returns `NoRetry` when retry is disabled, when `ctx` is at the last
    /// permitted attempt, or when `error` is not in the retryable set.
    pub fn decide<E: Classify + ?Sized>(&self, ctx: &AttemptContext, error: &E) -> RetryDecision {
        let Retry::Enabled(policy) = self else {
            return RetryDecision::NoRetry;
        };
        if ctx.attempt() >= policy.max_retries {
            return RetryDecision::NoRetry;
        }
        if !is_retryable(error, &policy.retryable_codes) {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(policy.backoff_delay(ctx.attempt()))
    }
}
