use std::path::Path;

use anyhow::{Context, Result};
use drift_datasets::config::LoaderConfig;
use drift_datasets::datasets::{SeaLoader, StreamDataset};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Labelling thresholds of the four SEA concepts: class 1 when
/// `attribute_1 + attribute_2 <= theta`.
const CONCEPTS: [f64; 4] = [8.0, 9.0, 7.0, 9.5];
const RECORDS_PER_CONCEPT: usize = 2500;
const LABEL_NOISE: f64 = 0.1;
const SEED: u64 = 42;

fn write_sea(path: &Path, rng: &mut impl Rng) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut rows = 0;
    for theta in CONCEPTS {
        for _ in 0..RECORDS_PER_CONCEPT {
            let a: [f64; 3] = [
                rng.gen_range(0.0..10.0),
                rng.gen_range(0.0..10.0),
                rng.gen_range(0.0..10.0),
            ];
            let mut label = u8::from(a[0] + a[1] <= theta);
            if rng.gen_bool(LABEL_NOISE) {
                label = 1 - label;
            }
            writer
                .write_record([
                    format!("{:.6}", a[0]),
                    format!("{:.6}", a[1]),
                    format!("{:.6}", a[2]),
                    label.to_string(),
                ])
                .with_context(|| format!("writing row {rows}"))?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV writer")?;
    Ok(rows)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(SEED);
    let data_path = Path::new("sea_sample.csv");
    let rows = write_sea(data_path, &mut rng)?;
    info!("wrote {rows} SEA records to {}", data_path.display());

    let sea = SeaLoader::new(&LoaderConfig::new(data_path)).context("preparing SEA sample")?;
    let cache_path = Path::new("sea_sample.bin");
    let written = sea.save(cache_path).context("caching SEA sample")?;

    println!(
        "Wrote {rows} records to {} ({} historical, {} stream){}",
        data_path.display(),
        sea.get_historical_data().1.len(),
        sea.get_stream_data().1.len(),
        if written {
            format!(", cache at {}", cache_path.display())
        } else {
            format!(", kept existing cache {}", cache_path.display())
        }
    );
    Ok(())
}
