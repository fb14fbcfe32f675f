use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write `contents` to `name` inside a fresh temporary directory.
pub fn write_raw(name: &str, contents: &str) -> Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    std::fs::write(&path, contents)?;
    Ok((dir, path))
}

/// Ten SEA records.  Features are columns 1 and 2.  The boundary record
/// (row 2) is the only one labelled 2.
pub const SEA_TEN: &str = "\
1.0,2.0,3.0,0
4.0,8.0,1.0,1
7.0,9.5,0.2,2
2.0,4.0,2.0,1
9.0,5.0,1.5,0
3.0,7.0,2.5,1
6.0,3.0,1.0,0
8.0,6.0,3.0,1
5.0,2.0,2.0,0
0.5,8.0,1.2,1
";

/// Build one KDD Cup record from its symbolic values and a seed for the
/// numeric columns.
pub fn kdd_row(protocol: &str, service: &str, flag: &str, label: &str, seed: u32) -> String {
    let mut cells: Vec<String> = Vec::with_capacity(42);
    cells.push(seed.to_string());
    cells.push(protocol.to_string());
    cells.push(service.to_string());
    cells.push(flag.to_string());
    for i in 4..41 {
        cells.push(((seed * 7 + i) % 11).to_string());
    }
    cells.push(label.to_string());
    cells.join(",")
}
