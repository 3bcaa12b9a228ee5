//! Retry and backoff around a single fallible call.
//!
//! Classification (which error kinds are worth another attempt), the backoff
//! policy and the retry loop itself live here, so every caller shares one
//! consistent set of rules.

mod classify;
mod context;
mod error;
mod policy;
mod run;

pub use classify::{is_retryable, Classify, ErrorKind, RetryableCodes, UnknownErrorKind};
pub use context::AttemptContext;
pub use error::{CallError, RunError};
pub use policy::{Retry, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
