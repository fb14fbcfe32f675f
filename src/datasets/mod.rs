//! Dataset-specific parsers sharing the [`DataLoader`] contract.

pub mod kdd;
pub mod sea;
pub mod usenet;

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::LoaderConfig;
use crate::data::model::Label;
use crate::error::{DataError, Result};
use crate::state::{DataLoader, Stage};

pub use kdd::KddCupLoader;
pub use sea::SeaLoader;
pub use usenet::UsenetLoader;

/// A prepared dataset: historical data for pre-training and stream data for
/// the online phase.
pub trait StreamDataset {
    /// Short dataset name used in logs.
    fn name(&self) -> &'static str;

    fn loader(&self) -> &DataLoader;

    fn get_stream_data(&self) -> (&[Vec<f64>], &[Label]) {
        self.loader().get_stream_data()
    }

    fn get_historical_data(&self) -> (&[Vec<f64>], &[Label]) {
        self.loader().get_historical_data()
    }

    fn get_classes(&self) -> Option<&BTreeSet<Label>> {
        self.loader().get_classes()
    }

    fn stage(&self) -> Stage {
        self.loader().stage()
    }

    /// Write the prepared arrays to `path` unless a file already exists.
    fn save(&self, path: &Path) -> Result<bool> {
        self.loader().save(path)
    }
}

/// The supported benchmark datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Sea,
    KddCup,
    Usenet,
}

impl FromStr for DatasetKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sea" => Ok(DatasetKind::Sea),
            "kdd" | "kdd_cup" | "kddcup" => Ok(DatasetKind::KddCup),
            "usenet" => Ok(DatasetKind::Usenet),
            other => Err(DataError::Config(format!("unknown dataset: {other}"))),
        }
    }
}

/// Build the loader for `kind`.
pub fn open(kind: DatasetKind, config: &LoaderConfig) -> Result<Box<dyn StreamDataset>> {
    match kind {
        DatasetKind::Sea => Ok(Box::new(SeaLoader::new(config)?)),
        DatasetKind::KddCup => Ok(Box::new(KddCupLoader::new(config)?)),
        DatasetKind::Usenet => Ok(Box::new(UsenetLoader::new(config)?)),
    }
}

/// Shared constructor path: validate, then either restore from cache or
/// hand the raw file to `prepare`.
pub(crate) fn init_loader(
    config: &LoaderConfig,
    prepare: impl FnOnce(&mut DataLoader) -> Result<()>,
) -> Result<DataLoader> {
    config.validate()?;
    let mut loader = DataLoader::new();
    if config.use_cache_for_loading {
        loader.load(&config.data_path)?;
    } else {
        prepare(&mut loader)?;
    }
    Ok(loader)
}
