//! `rerun exec -- <command>` – run a command under the retry loop.

use anyhow::{Context, Result};
use rerun_core::{run_with_retry, CallError, Cancelled, ErrorKind, Retry, RunError};
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use crate::cli::exit_status::check_status;

pub async fn run_exec(retry: &Retry, timeout: Option<Duration>, command: &[String]) -> Result<()> {
    let (program, args) = command.split_first().context("no command given")?;

    let token = CancellationToken::new();
    let ctrl_c = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, cancelling");
                token.cancel();
            }
        })
    };

    let mut attempt = 0u32;
    let result = run_with_retry(retry, &token, || {
        attempt += 1;
        tracing::info!(attempt, program = %program, "starting attempt");
        run_once(program, args, timeout, &token)
    })
    .await;
    ctrl_c.abort();

    match result {
        Ok(()) => Ok(()),
        Err(RunError::Cancelled(c)) => Err(c.into()),
        Err(RunError::Attempt(e)) => {
            Err(e.context(format!("giving up after {attempt} attempt(s)")))
        }
    }
}

/// One attempt: spawn the child and wait for it, bounded by `timeout`.
/// The child is killed if the attempt is abandoned (timeout or cancellation).
async fn run_once(
    program: &str,
    args: &[String],
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn `{program}`"))?;

    let status = tokio::select! {
        status = wait_child(&mut child, timeout) => status?,
        () = cancel.cancelled() => return Err(Cancelled.into()),
    };
    check_status(status)
}

async fn wait_child(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus> {
    let Some(limit) = timeout else {
        return Ok(child.wait().await?);
    };
    match tokio::time::timeout(limit, child.wait()).await {
        Ok(status) => Ok(status?),
        Err(_) => {
            let message = format!("attempt exceeded {limit:?}");
            Err(CallError::new(ErrorKind::Timeout, message).into())
        }
    }
}
