//! `rerun config` – print the effective retry configuration.

use anyhow::Result;
use rerun_core::config::config_path;
use rerun_core::Retry;
use std::fmt::Write;

/// Human-readable summary of the retry setting and its backoff schedule.
pub fn describe_retry(retry: &Retry) -> String {
    let Some(policy) = retry.policy() else {
        return "retry: disabled (a single attempt, never retried)\n".to_string();
    };
    let mut out = String::new();
    let kinds: Vec<String> = policy
        .retryable_codes
        .sorted()
        .iter()
        .map(|k| k.to_string())
        .collect();
    let _ = writeln!(
        out,
        "retry: up to {} retries ({} attempts)",
        policy.max_retries,
        policy.max_attempts()
    );
    let _ = writeln!(
        out,
        "backoff: base {}ms, cap {}ms",
        policy.backoff_base.as_millis(),
        policy.backoff_max.as_millis()
    );
    let _ = writeln!(out, "retryable kinds: {}", kinds.join(", "));
    for attempt in 0..policy.max_retries {
        let delay = policy.backoff_delay(attempt);
        if delay >= policy.backoff_max && attempt + 1 < policy.max_retries {
            let _ = writeln!(
                out,
                "  after attempts {}..={} fail: wait {}ms each",
                attempt + 1,
                policy.max_retries,
                delay.as_millis()
            );
            break;
        }
        let _ = writeln!(
            out,
            "  after attempt {} fails: wait {}ms",
            attempt + 1,
            delay.as_millis()
        );
    }
    out
}

pub fn run_show_config(retry: &Retry, attempt_timeout_secs: Option<u64>) -> Result<()> {
    println!("config file: {}", config_path()?.display());
    match attempt_timeout_secs {
        Some(secs) => println!("attempt timeout: {secs}s"),
        None => println!("attempt timeout: none"),
    }
    print!("{}", describe_retry(retry));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rerun_core::RetryPolicy;
    use std::time::Duration;

    #[test]
    fn describe_disabled() {
        assert!(describe_retry(&Retry::Disabled).contains("disabled"));
    }

    #[test]
    fn describe_schedule() {
        let retry = Retry::Enabled(
            RetryPolicy::default()
                .with_max_retries(3)
                .with_backoff(Duration::from_millis(100), Duration::from_millis(250)),
        );
        let text = describe_retry(&retry);
        assert!(text.contains("up to 3 retries (4 attempts)"), "{text}");
        assert!(text.contains("network_error, timeout, service_unavailable"), "{text}");
        assert!(text.contains("after attempt 1 fails: wait 100ms"), "{text}");
        assert!(text.contains("after attempt 2 fails: wait 200ms"), "{text}");
        assert!(text.contains("after attempt 3 fails: wait 250ms"), "{text}");
        assert!(!text.contains("after attempt 4"), "{text}");
    }

    #[test]
    fn describe_huge_budget_stays_short() {
        let retry = Retry::Enabled(
            RetryPolicy::default()
                .with_max_retries(u32::MAX)
                .with_backoff(Duration::from_millis(100), Duration::from_millis(400)),
        );
        let text = describe_retry(&retry);
        assert!(text.lines().count() < 10, "{text}");
        assert!(text.contains("after attempt 2 fails: wait 200ms"), "{text}");
        assert!(
            text.contains(&format!("after attempts 3..={} fail: wait 400ms each", u32::MAX)),
            "{text}"
        );
    }
}
