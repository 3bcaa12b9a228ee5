//! Map a child's exit status onto error kinds.
//!
//! Only statuses with a well-known transient meaning are tagged; any other
//! failure is left untagged and therefore never retried.

use anyhow::Result;
use rerun_core::{CallError, Cancelled, ErrorKind};
use std::process::ExitStatus;

/// sysexits.h: host name unknown.
const EX_NOHOST: i32 = 68;
/// sysexits.h: service unavailable.
const EX_UNAVAILABLE: i32 = 69;
/// sysexits.h: temporary failure, retry later.
const EX_TEMPFAIL: i32 = 75;
/// timeout(1): command timed out.
const TIMEOUT_EXIT: i32 = 124;

/// Exit status used when the run is cancelled with Ctrl-C (128 + SIGINT).
pub const EXIT_CANCELLED: i32 = 130;

/// The child ran and exited unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("command failed: {status}")]
pub struct CommandFailed {
    pub status: ExitStatus,
}

impl CommandFailed {
    /// Status to exit `rerun` with: the child's code, or 128 + signal when it was killed.
    pub fn exit_code(&self) -> i32 {
        if let Some(code) = self.status.code() {
            return code;
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = self.status.signal() {
                return 128 + signal;
            }
        }
        1
    }
}

pub fn classify_exit_code(code: Option<i32>) -> Option<ErrorKind> {
    match code? {
        EX_NOHOST => Some(ErrorKind::NetworkError),
        EX_UNAVAILABLE | EX_TEMPFAIL => Some(ErrorKind::ServiceUnavailable),
        TIMEOUT_EXIT => Some(ErrorKind::Timeout),
        _ => None,
    }
}

/// `Ok` on success, otherwise `CommandFailed`, tagged per `classify_exit_code`.
pub fn check_status(status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    let failed = anyhow::Error::new(CommandFailed { status });
    match classify_exit_code(status.code()) {
        Some(kind) => Err(failed.context(CallError::new(kind, "transient exit status"))),
        None => Err(failed),
    }
}

/// Process exit status for a failed run: 130 when cancelled, the child's own
/// status when it ran and failed, 1 otherwise.
pub fn process_exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<Cancelled>().is_some() {
        return EXIT_CANCELLED;
    }
    err.downcast_ref::<CommandFailed>()
        .map(CommandFailed::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rerun_core::retry::Classify;

    #[test]
    fn sysexits_transient_codes_tagged() {
        assert_eq!(classify_exit_code(Some(68)), Some(ErrorKind::NetworkError));
        assert_eq!(classify_exit_code(Some(69)), Some(ErrorKind::ServiceUnavailable));
        assert_eq!(classify_exit_code(Some(75)), Some(ErrorKind::ServiceUnavailable));
        assert_eq!(classify_exit_code(Some(124)), Some(ErrorKind::Timeout));
    }

    #[test]
    fn other_failures_untagged() {
        assert_eq!(classify_exit_code(Some(1)), None);
        assert_eq!(classify_exit_code(Some(2)), None);
        // Killed by a signal: no exit code.
        assert_eq!(classify_exit_code(None), None);
    }

    #[cfg(unix)]
    #[test]
    fn check_status_tags_tempfail() {
        use std::os::unix::process::ExitStatusExt;

        assert!(check_status(ExitStatus::from_raw(0)).is_ok());
        let err = check_status(ExitStatus::from_raw(75 << 8)).unwrap_err();
        assert_eq!(err.error_kind(), Some(ErrorKind::ServiceUnavailable));
        assert_eq!(process_exit_code(&err), 75);
        let err = check_status(ExitStatus::from_raw(1 << 8)).unwrap_err();
        assert_eq!(err.error_kind(), None);
        assert_eq!(process_exit_code(&err), 1);
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_passes_through_context_and_signals() {
        use std::os::unix::process::ExitStatusExt;

        let err = check_status(ExitStatus::from_raw(3 << 8))
            .unwrap_err()
            .context("giving up after 1 attempt(s)");
        assert_eq!(process_exit_code(&err), 3);

        // Killed by SIGKILL (9).
        let err = check_status(ExitStatus::from_raw(9)).unwrap_err();
        assert_eq!(process_exit_code(&err), 137);
    }

    #[test]
    fn cancelled_and_other_errors_map_to_fixed_codes() {
        assert_eq!(process_exit_code(&anyhow::Error::new(Cancelled)), EXIT_CANCELLED);
        assert_eq!(process_exit_code(&anyhow::anyhow!("no command given")), 1);
    }
}
