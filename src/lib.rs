//! Loaders that turn concept-drift benchmark datasets (SEA, KDD Cup 1999,
//! Usenet) into a historical partition for pre-training and a stream
//! partition for online learning.
//!
//! ```no_run
//! use drift_datasets::config::LoaderConfig;
//! use drift_datasets::datasets::{open, DatasetKind, StreamDataset};
//!
//! let config = LoaderConfig::new("data/sea.data").with_percentage(0.2);
//! let sea = open(DatasetKind::Sea, &config)?;
//! let (x_hist, y_hist) = sea.get_historical_data();
//! let (x_stream, y_stream) = sea.get_stream_data();
//! # let _ = (x_hist, y_hist, x_stream, y_stream);
//! # Ok::<(), drift_datasets::error::DataError>(())
//! ```

pub mod config;
pub mod data;
pub mod datasets;
pub mod error;
pub mod state;
