//! Integration test: retry configuration loaded from a TOML file on disk.

use std::time::Duration;

use rerun_core::config::{self, RetrySetting};
use rerun_core::{ErrorKind, Retry};
use tempfile::tempdir;

#[test]
fn load_disabled_retry_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "attempt_timeout_secs = 5\nretry = false\n").unwrap();

    let cfg = config::load_from_path(&path).unwrap();
    assert_eq!(cfg.attempt_timeout_secs, Some(5));
    assert_eq!(cfg.retry, RetrySetting::Toggle(false));
    assert_eq!(cfg.retry.to_retry().unwrap(), Retry::Disabled);
}

#[test]
fn load_policy_table_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let toml = r#"
        [retry]
        max_retries = 2
        backoff_base_ms = 10
        backoff_max_ms = 15
        retryable_error_codes = ["timeout"]
    "#;
    std::fs::write(&path, toml).unwrap();

    let cfg = config::load_from_path(&path).unwrap();
    let retry = cfg.retry.to_retry().unwrap();
    let policy = retry.policy().expect("retry enabled");
    assert_eq!(policy.max_retries, 2);
    assert_eq!(policy.backoff_delay(0), Duration::from_millis(10));
    assert_eq!(policy.backoff_delay(1), Duration::from_millis(15));
    assert_eq!(policy.retryable_codes.sorted(), vec![ErrorKind::Timeout]);
}

#[test]
fn invalid_backoff_fails_to_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[retry]\nbackoff_base_ms = 0\n").unwrap();

    let err = config::load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("backoff_base_ms"), "{err}");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(config::load_from_path(&dir.path().join("nope.toml")).is_err());
}

#[test]
fn misspelled_key_fails_to_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[retry]\nmax_retry = 0\n").unwrap();

    let err = config::load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("max_retry"), "{err}");
}
