use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

fn default_percentage() -> f64 {
    0.2
}

fn default_dummies() -> bool {
    true
}

/// Options recognized by every dataset loader.
///
/// JSON form (only `data_path` is required):
///
/// ```json
/// {
///   "data_path": "data/kddcup.data_10_percent",
///   "use_cache_for_loading": false,
///   "percentage_historical_data": 0.2,
///   "dummies": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Raw dataset file, or the cache file when loading from cache.
    pub data_path: PathBuf,
    /// Skip raw parsing and restore the arrays from `data_path`.
    #[serde(default, alias = "use_pickle_for_loading")]
    pub use_cache_for_loading: bool,
    /// Share of records set aside as historical data, in `[0, 1]`.
    #[serde(default = "default_percentage")]
    pub percentage_historical_data: f64,
    /// KDD Cup only: one-hot encode symbolic features (`true`) or
    /// integer-encode them in place (`false`, for tree learners).
    #[serde(default = "default_dummies")]
    pub dummies: bool,
}

impl LoaderConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            use_cache_for_loading: false,
            percentage_historical_data: default_percentage(),
            dummies: default_dummies(),
        }
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache_for_loading = use_cache;
        self
    }

    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage_historical_data = percentage;
        self
    }

    pub fn with_dummies(mut self, dummies: bool) -> Self {
        self.dummies = dummies;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: LoaderConfig =
            serde_json::from_str(text).map_err(|e| DataError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let p = self.percentage_historical_data;
        if !(0.0..=1.0).contains(&p) {
            return Err(DataError::Config(format!(
                "percentage_historical_data must be between 0 and 1, got {p}"
            )));
        }
        Ok(())
    }
}
