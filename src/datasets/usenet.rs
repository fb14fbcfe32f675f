//! Usenet: word-presence indicators from 20 Newsgroups, simulating a user
//! whose interests drift between topics.

use std::path::Path;

use log::info;

use super::{init_loader, StreamDataset};
use crate::config::LoaderConfig;
use crate::data::loader::read_records;
use crate::data::model::{Dataset, Label};
use crate::error::{DataError, Result};
use crate::state::DataLoader;

/// Presence tokens.  `tt` is a typo present in the published files.
pub const VOCABULARY: [(&str, f64); 5] = [
    ("no", 0.0),
    ("yes", 1.0),
    ("t", 1.0),
    ("f", 0.0),
    ("tt", 1.0),
];

/// Headerless Usenet file → split partitions.  Indicators are already in
/// `{0, 1}`, so no normalization is applied.
#[derive(Debug)]
pub struct UsenetLoader {
    loader: DataLoader,
}

impl UsenetLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let loader = init_loader(config, |loader| {
            let dataset = read_usenet(&config.data_path)?;
            loader.set_dataset(dataset)?;
            loader.split(config.percentage_historical_data)
        })?;
        info!(
            "Usenet ready: {} historical, {} stream records",
            loader.get_historical_data().1.len(),
            loader.get_stream_data().1.len()
        );
        Ok(Self { loader })
    }
}

impl StreamDataset for UsenetLoader {
    fn name(&self) -> &'static str {
        "usenet"
    }

    fn loader(&self) -> &DataLoader {
        &self.loader
    }
}

/// Map one cell to its indicator value.  Cells that are already numeric are
/// taken as they are.
pub fn indicator(cell: &str) -> Option<f64> {
    VOCABULARY
        .iter()
        .find(|(token, _)| *token == cell)
        .map(|&(_, v)| v)
        .or_else(|| cell.parse::<f64>().ok())
}

fn read_usenet(path: &Path) -> Result<Dataset> {
    let rows = read_records(path)?;
    let mut features = Vec::with_capacity(rows.len());
    let mut labels = Vec::with_capacity(rows.len());

    for (row_no, row) in rows.iter().enumerate() {
        let (label, cells) = row.split_last().ok_or_else(|| {
            DataError::Format(format!("{}, row {row_no}: empty record", path.display()))
        })?;
        let x = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                indicator(cell).ok_or_else(|| {
                    DataError::Format(format!(
                        "{}, row {row_no}, column {col}: unknown token '{cell}'",
                        path.display()
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        features.push(x);
        labels.push(Label::parse(label));
    }

    Dataset::new(features, labels)
}
