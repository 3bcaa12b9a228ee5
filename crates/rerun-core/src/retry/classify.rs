//! Classify failures into error kinds and decide whether a kind is retryable.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::error::CallError;

/// Classification tag carried by a failed attempt.
///
/// Callers map transport failures, status codes or exit statuses onto these
/// kinds; the retry policy only ever looks at the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network-level failure (connection refused/reset, DNS, etc.).
    NetworkError,
    /// Attempt timed out.
    Timeout,
    /// Remote side failed while handling the request (5xx-class).
    ServerError,
    /// Remote side is temporarily unavailable (e.g. 503, EX_TEMPFAIL).
    ServiceUnavailable,
    /// Remote side asked us to slow down (e.g. 429).
    RateLimited,
    /// Credentials missing or rejected.
    Unauthorized,
    /// The request itself is invalid; repeating it cannot help.
    InvalidRequest,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::NetworkError,
        ErrorKind::Timeout,
        ErrorKind::ServerError,
        ErrorKind::ServiceUnavailable,
        ErrorKind::RateLimited,
        ErrorKind::Unauthorized,
        ErrorKind::InvalidRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkError => "network_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ServerError => "server_error",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InvalidRequest => "invalid_request",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown error kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error kind `{0}`")]
pub struct UnknownErrorKind(pub String);

impl FromStr for ErrorKind {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownErrorKind(s.to_string()))
    }
}

/// Anything that may carry an error-kind tag.
///
/// `None` means the failure is untagged; untagged failures are never retried.
pub trait Classify {
    fn error_kind(&self) -> Option<ErrorKind>;
}

impl Classify for CallError {
    fn error_kind(&self) -> Option<ErrorKind> {
        Some(self.kind())
    }
}

impl Classify for anyhow::Error {
    fn error_kind(&self) -> Option<ErrorKind> {
        self.downcast_ref::<CallError>().map(CallError::kind)
    }
}

impl<T: Classify + ?Sized> Classify for Arc<T> {
    fn error_kind(&self) -> Option<ErrorKind> {
        (**self).error_kind()
    }
}

/// Set of error kinds that warrant another attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryableCodes(HashSet<ErrorKind>);

impl RetryableCodes {
    /// An empty set: nothing is retryable.
    pub fn none() -> Self {
        Self(HashSet::new())
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Kinds in declaration order (stable output for display).
    pub fn sorted(&self) -> Vec<ErrorKind> {
        ErrorKind::ALL
            .into_iter()
            .filter(|k| self.contains(*k))
            .collect()
    }
}

impl Default for RetryableCodes {
    fn default() -> Self {
        [
            ErrorKind::NetworkError,
            ErrorKind::Timeout,
            ErrorKind::ServiceUnavailable,
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<ErrorKind> for RetryableCodes {
    fn from_iter<I: IntoIterator<Item = ErrorKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// True iff the error carries a kind tag and that kind is in `codes`.
pub fn is_retryable<E: Classify + ?Sized>(error: &E, codes: &RetryableCodes) -> bool {
    error.error_kind().is_some_and(|kind| codes.contains(kind))
}
