//! Tests for merging retry flags over the configured setting.

use crate::cli::RetryArgs;
use rerun_core::config::{RetryConfig, RetrySetting};
use rerun_core::{ErrorKind, Retry, RetryPolicy};
use std::time::Duration;

#[test]
fn no_flags_keeps_config() {
    let retry = RetryArgs::default()
        .resolve(&RetrySetting::default())
        .unwrap();
    assert_eq!(retry, Retry::default());
}

#[test]
fn no_retry_flag_disables() {
    let args = RetryArgs {
        no_retry: true,
        ..RetryArgs::default()
    };
    assert_eq!(args.resolve(&RetrySetting::default()).unwrap(), Retry::Disabled);
}

#[test]
fn disabled_config_stays_disabled_without_flags() {
    let retry = RetryArgs::default()
        .resolve(&RetrySetting::Toggle(false))
        .unwrap();
    assert_eq!(retry, Retry::Disabled);
}

#[test]
fn tuning_flag_enables_over_disabled_config() {
    let args = RetryArgs {
        max_retries: Some(2),
        ..RetryArgs::default()
    };
    let retry = args.resolve(&RetrySetting::Toggle(false)).unwrap();
    assert_eq!(retry, Retry::Enabled(RetryPolicy::default().with_max_retries(2)));
}

#[test]
fn flags_override_config_table() {
    let configured = RetrySetting::Policy(RetryConfig {
        max_retries: 7,
        backoff_base_ms: 20,
        backoff_max_ms: 40,
        retryable_error_codes: Some(vec![ErrorKind::RateLimited]),
    });
    let args = RetryArgs {
        backoff_max_ms: Some(100),
        retry_on: vec![ErrorKind::ServerError],
        ..RetryArgs::default()
    };
    let retry = args.resolve(&configured).unwrap();
    let policy = retry.policy().unwrap();
    assert_eq!(policy.max_retries, 7);
    assert_eq!(policy.backoff_base, Duration::from_millis(20));
    assert_eq!(policy.backoff_max, Duration::from_millis(100));
    assert_eq!(policy.retryable_codes.sorted(), vec![ErrorKind::ServerError]);
}

#[test]
fn zero_backoff_flag_rejected() {
    let args = RetryArgs {
        backoff_base_ms: Some(0),
        ..RetryArgs::default()
    };
    assert!(args.resolve(&RetrySetting::default()).is_err());
}
