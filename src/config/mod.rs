//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `QUANDA_*` environment
//! variables.

mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::default_pool_capacity;
use crate::encoding::TruncationPolicy;

/// Pipeline configuration loaded from environment variables.
///
/// Use [`QaConfig::from_env`] to read `QUANDA_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Path to the one-token-per-line vocabulary file.
    pub vocab_path: Option<PathBuf>,

    /// Path to the scoring-model checkpoint directory.
    pub model_path: Option<PathBuf>,

    /// Lowercase input text before segmentation. Default: `true`.
    pub lowercase: bool,

    /// Max concurrent scoring sessions. Default: available parallelism × 2.
    pub pool_capacity: usize,

    /// How long to wait for a pooled session. Default: 5 s.
    pub acquire_timeout: Duration,

    /// What to do when question + context exceed the fixed sequence length.
    /// Default: truncate the context.
    pub truncation: TruncationPolicy,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            vocab_path: None,
            model_path: None,
            lowercase: true,
            pool_capacity: default_pool_capacity(),
            acquire_timeout: Duration::from_secs(5),
            truncation: TruncationPolicy::default(),
        }
    }
}

impl QaConfig {
    const ENV_VOCAB_PATH: &'static str = "QUANDA_VOCAB_PATH";
    const ENV_MODEL_PATH: &'static str = "QUANDA_MODEL_PATH";
    const ENV_LOWERCASE: &'static str = "QUANDA_LOWERCASE";
    const ENV_POOL_CAPACITY: &'static str = "QUANDA_POOL_CAPACITY";
    const ENV_ACQUIRE_TIMEOUT_MS: &'static str = "QUANDA_ACQUIRE_TIMEOUT_MS";
    const ENV_TRUNCATION: &'static str = "QUANDA_TRUNCATION";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let vocab_path = Self::parse_optional_path_from_env(Self::ENV_VOCAB_PATH);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let lowercase = Self::parse_bool_from_env(Self::ENV_LOWERCASE, defaults.lowercase)?;
        let pool_capacity = Self::parse_capacity_from_env(defaults.pool_capacity)?;
        let acquire_timeout = Self::parse_timeout_from_env(defaults.acquire_timeout)?;
        let truncation = Self::parse_truncation_from_env(defaults.truncation)?;

        Ok(Self {
            vocab_path,
            model_path,
            lowercase,
            pool_capacity,
            acquire_timeout,
            truncation,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_capacity == 0 {
            return Err(ConfigError::InvalidCapacity {
                value: "0".to_string(),
            });
        }

        for path in [&self.vocab_path, &self.model_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
        }

        Ok(())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ConfigError::InvalidBool {
                    var: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_capacity_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_POOL_CAPACITY) {
            Ok(value) => {
                let capacity: usize =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::CapacityParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if capacity == 0 {
                    return Err(ConfigError::InvalidCapacity { value });
                }

                Ok(capacity)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_timeout_from_env(default: Duration) -> Result<Duration, ConfigError> {
        match env::var(Self::ENV_ACQUIRE_TIMEOUT_MS) {
            Ok(value) => {
                let millis: u64 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::TimeoutParseError {
                            value: value.clone(),
                            source: e,
                        })?;
                Ok(Duration::from_millis(millis))
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_truncation_from_env(
        default: TruncationPolicy,
    ) -> Result<TruncationPolicy, ConfigError> {
        match env::var(Self::ENV_TRUNCATION) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidTruncationPolicy { value }),
            Err(_) => Ok(default),
        }
    }
}
