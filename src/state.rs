use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use log::{debug, info, warn};

use crate::data::cache::{self, CacheBundle};
use crate::data::model::{Dataset, Label};
use crate::data::preprocess::MinMaxScaler;
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Where a loader is in its preparation lifecycle.
///
/// ```text
/// Unloaded ──set_dataset──▶ Loaded ──split──▶ Split ──normalize──▶ Normalized
///     │
///     └──load (cache)──▶ Restored
/// ```
///
/// `Restored` arrays are final: a cache may hold normalized data, so
/// `normalize` is rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unloaded,
    Loaded,
    Split,
    Normalized,
    Restored,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Unloaded => "unloaded",
            Stage::Loaded => "loaded",
            Stage::Split => "split",
            Stage::Normalized => "normalized",
            Stage::Restored => "restored",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// DataLoader
// ---------------------------------------------------------------------------

/// Arrays shared by every dataset parser: the stream partition, the
/// historical partition, the class inventory and the fitted scaler.
///
/// Before [`split`](Self::split) the stream slot holds the whole dataset.
#[derive(Debug)]
pub struct DataLoader {
    stage: Stage,
    stream: Dataset,
    historical: Dataset,
    classes: Option<BTreeSet<Label>>,
    scaler: Option<MinMaxScaler>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self {
            stage: Stage::Unloaded,
            stream: Dataset::default(),
            historical: Dataset::default(),
            classes: None,
            scaler: None,
        }
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Ingest a freshly parsed dataset and record its class inventory.
    pub fn set_dataset(&mut self, dataset: Dataset) -> Result<()> {
        self.require(Stage::Unloaded, "load a dataset")?;
        let classes = dataset.classes();
        debug!(
            "loaded {} records, {} features, {} classes",
            dataset.len(),
            dataset.n_features(),
            classes.len()
        );
        self.classes = Some(classes);
        self.stream = dataset;
        self.stage = Stage::Loaded;
        Ok(())
    }

    /// Features and labels used for the streaming part of the emulation.
    pub fn get_stream_data(&self) -> (&[Vec<f64>], &[Label]) {
        (&self.stream.features, &self.stream.labels)
    }

    /// Features and labels used to train a model before going online.
    pub fn get_historical_data(&self) -> (&[Vec<f64>], &[Label]) {
        (&self.historical.features, &self.historical.labels)
    }

    /// Distinct labels of the raw data.  `None` when the arrays came from a
    /// cache, which does not store the inventory.
    pub fn get_classes(&self) -> Option<&BTreeSet<Label>> {
        self.classes.as_ref()
    }

    pub fn scaler(&self) -> Option<&MinMaxScaler> {
        self.scaler.as_ref()
    }

    /// Split the loaded dataset, in order, into the first
    /// `floor(percentage * N)` records (historical) and the records from
    /// index `floor(percentage * N) + 1` on (stream).  The boundary record
    /// belongs to neither partition.
    pub fn split(&mut self, percentage: f64) -> Result<()> {
        self.require(Stage::Loaded, "split")?;
        if !(0.0..=1.0).contains(&percentage) {
            return Err(DataError::Config(format!(
                "historical percentage must be between 0 and 1, got {percentage}"
            )));
        }

        let full = std::mem::take(&mut self.stream);
        let total = full.len();
        let n_historical = (percentage * total as f64).floor() as usize;

        let mut features = full.features;
        let mut labels = full.labels;
        let stream = Dataset {
            features: features.split_off(n_historical).into_iter().skip(1).collect(),
            labels: labels.split_off(n_historical).into_iter().skip(1).collect(),
        };

        self.historical = Dataset { features, labels };
        self.stream = stream;
        self.stage = Stage::Split;

        if self.historical.is_empty() || self.stream.is_empty() {
            warn!(
                "split of {total} records at {percentage} left {} historical and {} stream records",
                self.historical.len(),
                self.stream.len()
            );
        }
        debug!(
            "split {total} records: {} historical, {} stream",
            self.historical.len(),
            self.stream.len()
        );
        Ok(())
    }

    /// Fit a min-max scaler on the historical partition and apply it to both
    /// partitions.  The stream is only transformed, never used for fitting.
    pub fn normalize(&mut self) -> Result<()> {
        self.require(Stage::Split, "normalize")?;
        let scaler = MinMaxScaler::fit_transform(&mut self.historical.features)?;
        scaler.transform(&mut self.stream.features)?;
        debug!("normalized {} features", scaler.n_features());

        self.scaler = Some(scaler);
        self.stage = Stage::Normalized;
        Ok(())
    }

    /// Refit a second scaler on the stream partition alone and rescale it
    /// into [0, 1].  The historical scaler returned by
    /// [`scaler`](Self::scaler) is untouched.  An empty stream is left as is
    /// and yields `None`.
    pub fn rescale_stream(&mut self) -> Result<Option<MinMaxScaler>> {
        self.require(Stage::Normalized, "rescale the stream")?;
        if self.stream.is_empty() {
            return Ok(None);
        }
        let scaler = MinMaxScaler::fit_transform(&mut self.stream.features)?;
        debug!("rescaled {} stream records", self.stream.len());
        Ok(Some(scaler))
    }

    /// Persist both partitions to `path`; an existing file is left as is.
    pub fn save(&self, path: &Path) -> Result<bool> {
        if self.stage == Stage::Unloaded {
            return Err(DataError::State("cannot save an unloaded dataset".to_string()));
        }
        let bundle = CacheBundle {
            x: self.stream.features.clone(),
            y: self.stream.labels.clone(),
            x_historical: self.historical.features.clone(),
            y_historical: self.historical.labels.clone(),
        };
        cache::save(&bundle, path)
    }

    /// Restore both partitions from a cache written by [`save`](Self::save).
    /// The class inventory stays unset and the stage becomes
    /// [`Stage::Restored`].
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.require(Stage::Unloaded, "load a cache")?;
        let bundle = cache::load(path)?;

        self.stream = Dataset::new(bundle.x, bundle.y)?;
        self.historical = Dataset::new(bundle.x_historical, bundle.y_historical)?;
        self.stage = Stage::Restored;
        info!(
            "restored {} historical and {} stream records from {}",
            self.historical.len(),
            self.stream.len(),
            path.display()
        );
        Ok(())
    }

    fn require(&self, expected: Stage, operation: &str) -> Result<()> {
        if self.stage != expected {
            return Err(DataError::State(format!(
                "cannot {operation} while {}, expected {expected}",
                self.stage
            )));
        }
        Ok(())
    }
}
