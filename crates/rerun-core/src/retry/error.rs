//! Error types produced by attempts and by the retry loop.

use super::classify::ErrorKind;
use crate::cancel::Cancelled;

/// A failure tagged with its error kind.
///
/// Attempt invokers that want their failures retried return (or wrap) this.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CallError {
    kind: ErrorKind,
    message: String,
}

impl CallError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Terminal failure of a `run_with_retry` call.
///
/// Exactly one of these is produced per call: either the cancellation failure
/// or the last attempt's error, passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum RunError<E> {
    /// The cancellation signal fired before the loop could finish.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// The final attempt's own error (non-retryable, retry disabled, or budget exhausted).
    #[error(transparent)]
    Attempt(E),
}

impl<E> RunError<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunError::Cancelled(_))
    }

    pub fn attempt_error(&self) -> Option<&E> {
        match self {
            RunError::Attempt(e) => Some(e),
            RunError::Cancelled(_) => None,
        }
    }

    pub fn into_attempt_error(self) -> Option<E> {
        match self {
            RunError::Attempt(e) => Some(e),
            RunError::Cancelled(_) => None,
        }
    }
}
