//! Cancellation seam: what the retry loop needs from a caller's abort signal.
//!
//! The loop only reads the signal. It polls `is_cancelled` at decision points
//! and subscribes through `cancelled` for the duration of a backoff wait;
//! dropping that future is the unsubscribe.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Error returned when a run is stopped by the caller's cancellation signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// A shared, caller-owned cancellation signal.
pub trait CancelSignal {
    /// Whether cancellation has already been requested.
    fn is_cancelled(&self) -> bool;

    /// Resolves once cancellation is requested. The subscription lives as long
    /// as the returned future.
    fn cancelled(&self) -> impl Future<Output = ()> + Send + '_;
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }

    fn cancelled(&self) -> impl Future<Output = ()> + Send + '_ {
        CancellationToken::cancelled(self)
    }
}

impl<S: CancelSignal + ?Sized> CancelSignal for Arc<S> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }

    fn cancelled(&self) -> impl Future<Output = ()> + Send + '_ {
        (**self).cancelled()
    }
}

/// Signal for callers that have nothing to cancel with.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancelled;

impl CancelSignal for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }

    fn cancelled(&self) -> impl Future<Output = ()> + Send + '_ {
        std::future::pending()
    }
}
