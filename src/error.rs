use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while parsing, preparing or caching a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file could not be opened, read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A raw file does not match its schema, or a cache file is malformed.
    #[error("format error: {0}")]
    Format(String),

    /// An operation was invoked out of lifecycle order.
    #[error("state error: {0}")]
    State(String),

    /// Invalid loader configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Map a `csv` error onto the taxonomy: I/O failures stay I/O errors,
    /// everything else (unequal row lengths, bad UTF-8) is a format error.
    pub fn from_csv(path: &Path, err: csv::Error) -> Self {
        if !err.is_io_error() {
            return DataError::Format(format!("{}: {err}", path.display()));
        }
        match err.into_kind() {
            csv::ErrorKind::Io(source) => DataError::io(path, source),
            other => DataError::Format(format!("{}: {other:?}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::State("normalize before split".to_string());
        assert!(err.to_string().contains("state error"));

        let err = DataError::io(
            Path::new("missing.csv"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_csv_unequal_lengths_is_format_error() {
        let data = "1,2,3\n4,5\n";
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(data.as_bytes());
        let err = reader
            .records()
            .find_map(|r| r.err())
            .expect("second row should fail");
        assert!(matches!(
            DataError::from_csv(Path::new("rows.csv"), err),
            DataError::Format(_)
        ));
    }
}
