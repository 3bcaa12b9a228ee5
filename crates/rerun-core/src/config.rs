use anyhow::Result;
use serde::de::value::MapAccessDeserializer;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::retry::{ErrorKind, Retry, RetryPolicy, RetryableCodes};

/// Retry policy parameters (`[retry]` table in config.toml). Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds; doubles per retry.
    pub backoff_base_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub backoff_max_ms: u64,
    /// Error kinds to retry. When set, replaces the built-in set entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable_error_codes: Option<Vec<ErrorKind>>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            backoff_base_ms: policy.backoff_base.as_millis() as u64,
            backoff_max_ms: policy.backoff_max.as_millis() as u64,
            retryable_error_codes: None,
        }
    }
}

/// Invalid retry configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("retry.backoff_base_ms must be positive")]
    ZeroBackoffBase,
    #[error("retry.backoff_max_ms must be positive")]
    ZeroBackoffMax,
}

impl RetryConfig {
    /// Validate and build the runtime policy.
    pub fn to_policy(&self) -> Result<RetryPolicy, ConfigError> {
        if self.backoff_base_ms == 0 {
            return Err(ConfigError::ZeroBackoffBase);
        }
        if self.backoff_max_ms == 0 {
            return Err(ConfigError::ZeroBackoffMax);
        }
        let codes = match &self.retryable_error_codes {
            Some(kinds) => kinds.iter().copied().collect(),
            None => RetryableCodes::default(),
        };
        Ok(RetryPolicy {
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            backoff_max: Duration::from_millis(self.backoff_max_ms),
            retryable_codes: Arc::new(codes),
        })
    }
}

/// The `retry` key: `retry = false` disables retries, `retry = true` uses the
/// defaults, and a `[retry]` table tunes the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RetrySetting {
    Toggle(bool),
    Policy(RetryConfig),
}

// Hand-written so errors inside the table (unknown field, bad kind name)
// reach the user instead of a generic "did not match any variant".
impl<'de> Deserialize<'de> for RetrySetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SettingVisitor;

        impl<'de> Visitor<'de> for SettingVisitor {
            type Value = RetrySetting;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or a retry table")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(RetrySetting::Toggle(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                let cfg = RetryConfig::deserialize(MapAccessDeserializer::new(map))?;
                Ok(RetrySetting::Policy(cfg))
            }
        }

        deserializer.deserialize_any(SettingVisitor)
    }
}

impl Default for RetrySetting {
    fn default() -> Self {
        RetrySetting::Policy(RetryConfig::default())
    }
}

impl RetrySetting {
    pub fn to_retry(&self) -> Result<Retry, ConfigError> {
        match self {
            RetrySetting::Toggle(false) => Ok(Retry::Disabled),
            RetrySetting::Toggle(true) => Ok(Retry::default()),
            RetrySetting::Policy(cfg) => cfg.to_policy().map(Retry::Enabled),
        }
    }
}

/// Global configuration loaded from `~/.config/rerun/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RerunConfig {
    /// Per-attempt time limit in seconds; an attempt that runs longer fails
    /// with `timeout`. None = no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_timeout_secs: Option<u64>,
    pub retry: RetrySetting,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rerun")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RerunConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RerunConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Parse a config file at an explicit path.
pub fn load_from_path(path: &Path) -> Result<RerunConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: RerunConfig = toml::from_str(&data)?;
    cfg.retry.to_retry()?;
    Ok(cfg)
}
