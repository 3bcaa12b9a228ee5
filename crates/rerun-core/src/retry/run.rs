//! Retry loop: run an async attempt until success, a terminal error, or cancellation.

use std::future::Future;
use std::time::Duration;

use super::classify::Classify;
use super::context::AttemptContext;
use super::error::RunError;
use super::policy::{Retry, RetryDecision};
use crate::cancel::{CancelSignal, Cancelled};

/// Runs `invoke` until it succeeds or the retry setting says to stop.
///
/// Attempts run strictly one after another. A failed attempt is retried only
/// while budget remains and its kind is in the policy's retryable set; the
/// backoff wait in between races the cancellation signal. Once cancellation
/// is observed the call fails with [`RunError::Cancelled`] and `invoke` is not
/// called again. Any other terminal failure is the attempt's own error,
/// returned as-is.
pub async fn run_with_retry<T, E, F, Fut, S>(
    retry: &Retry,
    cancel: &S,
    mut invoke: F,
) -> Result<T, RunError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify,
    S: CancelSignal + ?Sized,
{
    let mut ctx = AttemptContext::new();
    loop {
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }

        let delay = match invoke().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                // Cancellation requested while the attempt was in flight.
                if cancel.is_cancelled() {
                    return Err(Cancelled.into());
                }
                match retry.decide(&ctx, &error) {
                    RetryDecision::NoRetry => return Err(RunError::Attempt(error)),
                    RetryDecision::RetryAfter(delay) => {
                        tracing::debug!(
                            attempt = ctx.attempt() + 1,
                            kind = ?error.error_kind(),
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "attempt failed, backing off before retry"
                        );
                        delay
                    }
                }
            }
        };

        backoff(delay, cancel).await?;
        ctx.record_backoff(delay);
    }
}

/// Sleeps for `delay` unless `cancel` fires first. Whichever side loses is
/// dropped on return, so neither the timer nor the subscription outlives it.
async fn backoff<S: CancelSignal + ?Sized>(delay: Duration, cancel: &S) -> Result<(), Cancelled> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Cancelled),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}
