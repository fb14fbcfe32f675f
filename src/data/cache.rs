//! Write-once binary snapshots of a split dataset.

use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::model::Label;
use crate::error::{DataError, Result};

/// The persisted arrays of one loader: stream partition and historical
/// partition.  Field names match the keys `X`, `y`, `X_historical`,
/// `y_historical`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheBundle {
    #[serde(rename = "X")]
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Label>,
    #[serde(rename = "X_historical")]
    pub x_historical: Vec<Vec<f64>>,
    pub y_historical: Vec<Label>,
}

/// Serialize `bundle` to `path` unless something already exists there.
///
/// The bundle is written to a temporary file next to `path` and only moved
/// into place once complete, so a failed write leaves nothing behind.
/// Returns `true` when the file was written, `false` when an existing file
/// was left untouched.
pub fn save(bundle: &CacheBundle, path: &Path) -> Result<bool> {
    if path.exists() {
        debug!("cache {} already exists, not overwriting", path.display());
        return Ok(false);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DataError::io(path, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        bincode::serialize_into(&mut writer, bundle).map_err(|e| match *e {
            bincode::ErrorKind::Io(source) => DataError::io(path, source),
            other => DataError::Format(format!("{}: {other}", path.display())),
        })?;
        writer.flush().map_err(|e| DataError::io(path, e))?;
    }

    // no-clobber: a file that appeared since the check above wins
    if let Err(e) = tmp.persist_noclobber(path) {
        if e.error.kind() == ErrorKind::AlreadyExists {
            debug!("cache {} already exists, not overwriting", path.display());
            return Ok(false);
        }
        return Err(DataError::io(path, e.error));
    }

    info!(
        "cached {} stream / {} historical records to {}",
        bundle.y.len(),
        bundle.y_historical.len(),
        path.display()
    );
    Ok(true)
}

/// Read a bundle written by [`save`].  Truncated, padded or inconsistent
/// files are format errors; nothing is returned unless all four arrays load.
pub fn load(path: &Path) -> Result<CacheBundle> {
    let bytes = std::fs::read(path).map_err(|e| DataError::io(path, e))?;
    let bundle: CacheBundle = bincode::deserialize(&bytes)
        .map_err(|e| DataError::Format(format!("{}: {e}", path.display())))?;

    let expected = bincode::serialized_size(&bundle)
        .map_err(|e| DataError::Format(format!("{}: {e}", path.display())))?;
    if expected != bytes.len() as u64 {
        return Err(DataError::Format(format!(
            "{}: {} trailing bytes after cache bundle",
            path.display(),
            bytes.len() as u64 - expected
        )));
    }
    if bundle.x.len() != bundle.y.len() || bundle.x_historical.len() != bundle.y_historical.len() {
        return Err(DataError::Format(format!(
            "{}: cached features and labels have different lengths",
            path.display()
        )));
    }

    debug!("loaded cache bundle from {}", path.display());
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle() -> CacheBundle {
        CacheBundle {
            x: vec![vec![0.25, 1.0], vec![0.5, 0.0]],
            y: vec![Label::Integer(1), Label::Integer(0)],
            x_historical: vec![vec![0.0, 0.5]],
            y_historical: vec![Label::Text("normal.".to_string())],
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.bin");

        assert!(save(&sample_bundle(), &path).unwrap());
        assert_eq!(load(&path).unwrap(), sample_bundle());
    }

    #[test]
    fn test_save_is_write_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.bin");

        save(&sample_bundle(), &path).unwrap();
        let first = std::fs::read(&path).unwrap();

        let other = CacheBundle::default();
        assert!(!save(&other, &path).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_save_leaves_only_the_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        save(&sample_bundle(), &path).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("bundle.bin")]);
    }

    #[test]
    fn test_failed_save_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("missing");
        let path = nested.join("bundle.bin");

        let err = save(&sample_bundle(), &path).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(!path.exists());

        // nothing stale blocks the next attempt
        std::fs::create_dir(&nested).unwrap();
        assert!(save(&sample_bundle(), &path).unwrap());
        assert_eq!(load(&path).unwrap(), sample_bundle());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn test_load_truncated_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        save(&sample_bundle(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(load(&path), Err(DataError::Format(_))));
    }

    #[test]
    fn test_load_trailing_bytes_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        save(&sample_bundle(), &path).unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        bytes.extend_from_slice(&[0xde, 0xad]);
        std::fs::write(&path, bytes).unwrap();
        assert!(matches!(load(&path), Err(DataError::Format(_))));
    }

    #[test]
    fn test_load_mismatched_lengths_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        let mut bundle = sample_bundle();
        bundle.y.pop();
        save(&bundle, &path).unwrap();
        assert!(matches!(load(&path), Err(DataError::Format(_))));
    }
}
