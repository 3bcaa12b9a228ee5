pub mod cancel;
pub mod config;
pub mod logging;
pub mod retry;

pub use cancel::{CancelSignal, Cancelled, NeverCancelled};
pub use retry::{run_with_retry, CallError, ErrorKind, Retry, RetryPolicy, RunError};
