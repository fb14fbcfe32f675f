use std::fs::File;
use std::path::Path;

use log::debug;

use super::model::Table;
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Raw delimited readers
// ---------------------------------------------------------------------------

/// Open a headerless, comma-delimited file.  Every row must have the same
/// number of fields.
fn open_headerless(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(file))
}

/// Read every record of a headerless file as raw string cells, in file
/// order.  An empty file is a format error.
pub fn read_records(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = open_headerless(path)?;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| DataError::from_csv(path, e))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if rows.is_empty() {
        return Err(DataError::Format(format!("{}: no records", path.display())));
    }
    debug!("read {} records from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read a headerless file against an injected schema.  Each record must have
/// exactly one field per name.
pub fn read_table(path: &Path, names: &[&str]) -> Result<Table> {
    let mut reader = open_headerless(path)?;
    let mut table = Table::new(names);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::from_csv(path, e))?;
        table.push_row(record.iter()).map_err(|e| match e {
            DataError::Format(msg) => {
                DataError::Format(format!("{}, CSV row {row_no}: {msg}", path.display()))
            }
            other => other,
        })?;
    }

    if table.is_empty() {
        return Err(DataError::Format(format!("{}: no records", path.display())));
    }
    debug!(
        "read {} records x {} columns from {}",
        table.len(),
        names.len(),
        path.display()
    );
    Ok(table)
}

/// Parse one numeric cell, naming its position on failure.
pub fn parse_f64(cell: &str, row: usize, col: usize) -> Result<f64> {
    cell.parse::<f64>()
        .map_err(|_| DataError::Format(format!("row {row}, column {col}: '{cell}' is not a number")))
}
