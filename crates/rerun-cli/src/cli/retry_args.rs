//! Retry flags shared by `exec` and `config`; they override the config file.

use anyhow::Result;
use clap::Args;
use rerun_core::config::{RetryConfig, RetrySetting};
use rerun_core::{ErrorKind, Retry};

#[derive(Debug, Clone, Default, Args)]
pub struct RetryArgs {
    /// Never retry, whatever the failure.
    #[arg(
        long,
        conflicts_with_all = ["max_retries", "backoff_base_ms", "backoff_max_ms", "retry_on"]
    )]
    pub no_retry: bool,

    /// Retries after the first attempt.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Delay before the first retry in milliseconds; doubles per retry.
    #[arg(long, value_name = "MS")]
    pub backoff_base_ms: Option<u64>,

    /// Cap on any single backoff delay in milliseconds.
    #[arg(long, value_name = "MS")]
    pub backoff_max_ms: Option<u64>,

    /// Error kind to retry (repeatable). Replaces the configured set.
    #[arg(long = "retry-on", value_name = "KIND")]
    pub retry_on: Vec<ErrorKind>,
}

impl RetryArgs {
    fn has_overrides(&self) -> bool {
        self.max_retries.is_some()
            || self.backoff_base_ms.is_some()
            || self.backoff_max_ms.is_some()
            || !self.retry_on.is_empty()
    }

    /// Merge the flags over the configured setting.
    ///
    /// A config with `retry = false` stays disabled unless a tuning flag is
    /// given, in which case the flags apply on top of the built-in defaults.
    pub fn resolve(&self, configured: &RetrySetting) -> Result<Retry> {
        if self.no_retry {
            return Ok(Retry::Disabled);
        }
        let mut cfg = match configured {
            RetrySetting::Toggle(false) if !self.has_overrides() => return Ok(Retry::Disabled),
            RetrySetting::Toggle(_) => RetryConfig::default(),
            RetrySetting::Policy(cfg) => cfg.clone(),
        };
        if let Some(n) = self.max_retries {
            cfg.max_retries = n;
        }
        if let Some(ms) = self.backoff_base_ms {
            cfg.backoff_base_ms = ms;
        }
        if let Some(ms) = self.backoff_max_ms {
            cfg.backoff_max_ms = ms;
        }
        if !self.retry_on.is_empty() {
            cfg.retryable_error_codes = Some(self.retry_on.clone());
        }
        Ok(Retry::Enabled(cfg.to_policy()?))
    }
}
