//! SEA concepts: a synthetic stream of three continuous attributes with
//! abrupt drift between four labelling thresholds.

use std::path::Path;

use log::info;

use super::{init_loader, StreamDataset};
use crate::config::LoaderConfig;
use crate::data::loader::{parse_f64, read_records};
use crate::data::model::{Dataset, Label};
use crate::data::preprocess::MinMaxScaler;
use crate::error::{DataError, Result};
use crate::state::DataLoader;

/// Column schema of a raw SEA file.
pub const COLUMNS: [&str; 4] = ["attribute_1", "attribute_2", "attribute_3", "label"];

/// Positions of the feature columns (`attribute_2`, `attribute_3`).
pub const FEATURE_COLUMNS: [usize; 2] = [1, 2];

/// Headerless SEA file → split, min-max normalized partitions.
///
/// After the shared normalization the stream is rescaled once more on its
/// own range, so both partitions end up in [0, 1].
#[derive(Debug)]
pub struct SeaLoader {
    loader: DataLoader,
    stream_scaler: Option<MinMaxScaler>,
}

impl SeaLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let mut stream_scaler = None;
        let loader = init_loader(config, |loader| {
            let dataset = read_sea(&config.data_path)?;
            loader.set_dataset(dataset)?;
            loader.split(config.percentage_historical_data)?;
            loader.normalize()?;
            stream_scaler = loader.rescale_stream()?;
            Ok(())
        })?;
        info!(
            "SEA ready: {} historical, {} stream records",
            loader.get_historical_data().1.len(),
            loader.get_stream_data().1.len()
        );
        Ok(Self {
            loader,
            stream_scaler,
        })
    }

    /// Scaler fitted on the already-normalized stream.  `None` for an empty
    /// stream or a cache-backed loader.
    pub fn stream_scaler(&self) -> Option<&MinMaxScaler> {
        self.stream_scaler.as_ref()
    }
}

impl StreamDataset for SeaLoader {
    fn name(&self) -> &'static str {
        "sea"
    }

    fn loader(&self) -> &DataLoader {
        &self.loader
    }
}

fn read_sea(path: &Path) -> Result<Dataset> {
    let rows = read_records(path)?;
    let mut features = Vec::with_capacity(rows.len());
    let mut labels = Vec::with_capacity(rows.len());

    for (row_no, row) in rows.iter().enumerate() {
        if row.len() != COLUMNS.len() {
            return Err(DataError::Format(format!(
                "{}, row {row_no}: {} fields, SEA records have {}",
                path.display(),
                row.len(),
                COLUMNS.len()
            )));
        }
        let x = FEATURE_COLUMNS
            .iter()
            .map(|&col| parse_f64(&row[col], row_no, col))
            .collect::<Result<Vec<f64>>>()?;
        features.push(x);
        labels.push(Label::parse(&row[COLUMNS.len() - 1]));
    }

    Dataset::new(features, labels)
}
