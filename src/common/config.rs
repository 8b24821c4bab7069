//! Runtime configuration loaded from the process environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

use crate::common::error::{PriceError, PriceResult};
use crate::features::domain::PlaceholderPolicy;

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub artifact_root: PathBuf,
    pub scaler_file: String,
    pub projector_file: String,
    pub regressor_file: String,
    pub placeholder: PlaceholderPolicy,
    pub log_level: LevelFilter,
    pub workers: usize,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> PriceResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup (environment, tests, FFI).
    pub fn from_lookup<F>(lookup: F) -> PriceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let placeholder = env_or("RENTAL_PLACEHOLDER", "strip")
            .parse::<PlaceholderPolicy>()
            .map_err(|_| PriceError::Config("RENTAL_PLACEHOLDER must be strip or zero_fill".into()))?;

        let log_level = LevelFilter::from_str(&env_or("RENTAL_LOG_LEVEL", "info"))
            .map_err(|_| PriceError::Config("RENTAL_LOG_LEVEL is not a log level".into()))?;

        let workers = env_or("RENTAL_WORKERS", "4")
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| PriceError::Config("RENTAL_WORKERS must be a positive integer".into()))?;

        Ok(Self {
            artifact_root: PathBuf::from(env_or("RENTAL_ARTIFACT_ROOT", "./models")),
            scaler_file: env_or("RENTAL_SCALER_FILE", "scaler.json"),
            projector_file: env_or("RENTAL_PROJECTOR_FILE", "pca_model.json"),
            regressor_file: env_or("RENTAL_REGRESSOR_FILE", "model_rbf.json"),
            placeholder,
            log_level,
            workers,
        })
    }

    /// Same configuration pointed at another artifact directory.
    pub fn with_artifact_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.artifact_root = root.into();
        self
    }
}
