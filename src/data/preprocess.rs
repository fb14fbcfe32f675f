//! Fitted preprocessing transforms: min-max scaling and categorical encoders.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// MinMaxScaler
// ---------------------------------------------------------------------------

/// Per-feature rescaling to `[0, 1]`:
///
/// ```text
/// x' = (x - min) / (max - min)
/// ```
///
/// A column whose fitted range is zero uses a scale of 1, so fitted values
/// map to 0 and later values map to `x - min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: Vec<f64>,
    data_max: Vec<f64>,
}

impl MinMaxScaler {
    /// Learn per-column minima and maxima.  NaN cells are ignored.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows.first().ok_or_else(|| {
            DataError::State("cannot fit min-max scaler on an empty partition".to_string())
        })?;
        let width = first.len();
        let mut data_min = vec![f64::INFINITY; width];
        let mut data_max = vec![f64::NEG_INFINITY; width];

        for (i, row) in rows.iter().enumerate() {
            check_width(row, width, i)?;
            for (j, &v) in row.iter().enumerate() {
                data_min[j] = data_min[j].min(v);
                data_max[j] = data_max[j].max(v);
            }
        }
        Ok(MinMaxScaler { data_min, data_max })
    }

    /// Fit on `rows`, then rescale them in place.
    pub fn fit_transform(rows: &mut [Vec<f64>]) -> Result<Self> {
        let scaler = Self::fit(rows)?;
        scaler.transform(rows)?;
        Ok(scaler)
    }

    /// Rescale `rows` in place with the fitted range.
    pub fn transform(&self, rows: &mut [Vec<f64>]) -> Result<()> {
        for (i, row) in rows.iter_mut().enumerate() {
            check_width(row, self.n_features(), i)?;
            for (j, v) in row.iter_mut().enumerate() {
                *v = (*v - self.data_min[j]) / self.scale(j);
            }
        }
        Ok(())
    }

    /// Undo [`transform`](Self::transform) in place.
    pub fn inverse_transform(&self, rows: &mut [Vec<f64>]) -> Result<()> {
        for (i, row) in rows.iter_mut().enumerate() {
            check_width(row, self.n_features(), i)?;
            for (j, v) in row.iter_mut().enumerate() {
                *v = *v * self.scale(j) + self.data_min[j];
            }
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.data_min.len()
    }

    pub fn data_min(&self) -> &[f64] {
        &self.data_min
    }

    pub fn data_max(&self) -> &[f64] {
        &self.data_max
    }

    fn scale(&self, j: usize) -> f64 {
        let range = self.data_max[j] - self.data_min[j];
        // All-NaN columns leave an infinite range; treat them like constants.
        if range == 0.0 || !range.is_finite() {
            1.0
        } else {
            range
        }
    }
}

fn check_width(row: &[f64], width: usize, i: usize) -> Result<()> {
    if row.len() != width {
        return Err(DataError::Format(format!(
            "row {i} has {} features, scaler expects {width}",
            row.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// LabelEncoder
// ---------------------------------------------------------------------------

/// Maps each distinct string to its rank among the sorted distinct values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit(values: &[String]) -> Self {
        let classes: BTreeSet<&String> = values.iter().collect();
        LabelEncoder {
            classes: classes.into_iter().cloned().collect(),
        }
    }

    pub fn fit_transform(values: &[String]) -> (Self, Vec<usize>) {
        let encoder = Self::fit(values);
        let codes = values
            .iter()
            .map(|v| encoder.code_of(v).unwrap_or_default())
            .collect();
        (encoder, codes)
    }

    /// Encode values; a value unseen during fitting is a format error.
    pub fn transform(&self, values: &[String]) -> Result<Vec<usize>> {
        values
            .iter()
            .map(|v| {
                self.code_of(v)
                    .ok_or_else(|| DataError::Format(format!("unseen category '{v}'")))
            })
            .collect()
    }

    /// Map codes back to their strings; an out-of-range code is a format error.
    pub fn inverse_transform(&self, codes: &[usize]) -> Result<Vec<String>> {
        codes
            .iter()
            .map(|&c| {
                self.classes.get(c).cloned().ok_or_else(|| {
                    DataError::Format(format!(
                        "code {c} out of range for {} classes",
                        self.classes.len()
                    ))
                })
            })
            .collect()
    }

    /// The fitted classes, sorted; a class's index is its code.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn code_of(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }
}

// ---------------------------------------------------------------------------
// OneHotEncoder
// ---------------------------------------------------------------------------

/// Expands a categorical column into one indicator column per sorted
/// distinct value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneHotEncoder {
    inner: LabelEncoder,
}

impl OneHotEncoder {
    pub fn fit(values: &[String]) -> Self {
        OneHotEncoder {
            inner: LabelEncoder::fit(values),
        }
    }

    /// Indicator column names, `<prefix>_<value>`.
    pub fn feature_names(&self, prefix: &str) -> Vec<String> {
        self.inner
            .classes()
            .iter()
            .map(|c| format!("{prefix}_{c}"))
            .collect()
    }

    /// One row of `0.0`/`1.0` indicators per value.
    pub fn transform(&self, values: &[String]) -> Result<Vec<Vec<f64>>> {
        let width = self.inner.classes().len();
        let codes = self.inner.transform(values)?;
        Ok(codes
            .into_iter()
            .map(|code| {
                let mut row = vec![0.0; width];
                row[code] = 1.0;
                row
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_min_max_fit_transform() {
        let mut rows = vec![vec![0.0, 10.0], vec![5.0, 20.0], vec![10.0, 30.0]];
        let scaler = MinMaxScaler::fit_transform(&mut rows).unwrap();
        assert_eq!(rows, vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![1.0, 1.0]]);
        assert_eq!(scaler.data_min(), &[0.0, 10.0]);
        assert_eq!(scaler.data_max(), &[10.0, 30.0]);
    }

    #[test]
    fn test_min_max_is_deterministic() {
        let original = vec![vec![3.0, -1.0], vec![7.5, 4.0], vec![1.0, 2.0]];
        let mut a = original.clone();
        let mut b = original.clone();
        MinMaxScaler::fit_transform(&mut a).unwrap();
        MinMaxScaler::fit_transform(&mut b).unwrap();
        assert_eq!(a, b);

        // Refitting already-scaled data is a fixed point.
        let mut again = a.clone();
        MinMaxScaler::fit_transform(&mut again).unwrap();
        assert_eq!(again, a);
    }

    #[test]
    fn test_min_max_transform_reuses_fitted_range() {
        let scaler = MinMaxScaler::fit(&[vec![0.0], vec![4.0]]).unwrap();
        let mut stream = vec![vec![2.0], vec![8.0], vec![-4.0]];
        scaler.transform(&mut stream).unwrap();
        assert_eq!(stream, vec![vec![0.5], vec![2.0], vec![-1.0]]);
    }

    #[test]
    fn test_min_max_constant_column() {
        let mut rows = vec![vec![3.0], vec![3.0]];
        let scaler = MinMaxScaler::fit_transform(&mut rows).unwrap();
        assert_eq!(rows, vec![vec![0.0], vec![0.0]]);

        let mut stream = vec![vec![5.0]];
        scaler.transform(&mut stream).unwrap();
        assert_eq!(stream, vec![vec![2.0]]);
    }

    #[test]
    fn test_min_max_inverse_round_trip() {
        let original = vec![vec![1.5, -2.0], vec![4.0, 6.0], vec![2.25, 0.0]];
        let mut rows = original.clone();
        let scaler = MinMaxScaler::fit_transform(&mut rows).unwrap();

        let mut stream = vec![vec![3.0, 1.0]];
        scaler.transform(&mut stream).unwrap();

        scaler.inverse_transform(&mut rows).unwrap();
        scaler.inverse_transform(&mut stream).unwrap();
        for (got, want) in rows.iter().flatten().zip(original.iter().flatten()) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!((stream[0][0] - 3.0).abs() < 1e-12);
        assert!((stream[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_empty_and_width_errors() {
        assert!(matches!(MinMaxScaler::fit(&[]), Err(DataError::State(_))));

        let scaler = MinMaxScaler::fit(&[vec![0.0, 1.0]]).unwrap();
        let mut bad = vec![vec![1.0]];
        assert!(matches!(scaler.transform(&mut bad), Err(DataError::Format(_))));
    }

    #[test]
    fn test_label_encoder_sorted_codes() {
        let values = strings(&["udp", "tcp", "icmp", "tcp"]);
        let (encoder, codes) = LabelEncoder::fit_transform(&values);
        assert_eq!(encoder.classes(), &strings(&["icmp", "tcp", "udp"])[..]);
        assert_eq!(codes, vec![2, 1, 0, 1]);
        assert_eq!(encoder.inverse_transform(&codes).unwrap(), values);
    }

    #[test]
    fn test_label_encoder_rejects_unknowns() {
        let encoder = LabelEncoder::fit(&strings(&["a", "b"]));
        assert!(encoder.transform(&strings(&["c"])).is_err());
        assert!(encoder.inverse_transform(&[2]).is_err());
    }

    #[test]
    fn test_one_hot_rows_and_names() {
        let values = strings(&["SF", "REJ", "SF"]);
        let encoder = OneHotEncoder::fit(&values);
        assert_eq!(encoder.feature_names("flag"), strings(&["flag_REJ", "flag_SF"]));
        assert_eq!(
            encoder.transform(&values).unwrap(),
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]]
        );
    }
}
