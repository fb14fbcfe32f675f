use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Label – the target value of one record
// ---------------------------------------------------------------------------

/// A dynamically-typed label.  Class inventories are `BTreeSet<Label>`, so
/// `Label` must be `Ord`; floats are compared with `total_cmp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Label {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Label {
    /// Interpret a raw cell: integer first, then float, otherwise the text
    /// itself, unchanged.
    pub fn parse(s: &str) -> Self {
        if let Ok(i) = s.parse::<i64>() {
            return Label::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Label::Float(f);
        }
        Label::Text(s.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Label::Integer(i) => Some(*i as f64),
            Label::Float(v) => Some(*v),
            Label::Text(_) => None,
        }
    }
}

// -- Manual Eq/Ord so we can put Label in BTreeSet --

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Label::*;
        fn discriminant(v: &Label) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for Label {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Label::Integer(i) => i.hash(state),
            Label::Float(f) => f.to_bits().hash(state),
            Label::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Integer(i) => write!(f, "{i}"),
            Label::Float(v) => write!(f, "{v}"),
            Label::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – row-aligned features and labels
// ---------------------------------------------------------------------------

/// Feature rows and their labels, in file order.
///
/// `features.len() == labels.len()` and every row has the same width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<Label>,
}

impl Dataset {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<Label>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(DataError::Format(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if let Some(first) = features.first() {
            let width = first.len();
            if let Some((i, row)) = features.iter().enumerate().find(|(_, r)| r.len() != width) {
                return Err(DataError::Format(format!(
                    "row {i} has {} features, expected {width}",
                    row.len()
                )));
            }
        }
        Ok(Dataset { features, labels })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width of a feature row (0 for an empty dataset).
    pub fn n_features(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    /// The sorted set of distinct labels.
    pub fn classes(&self) -> BTreeSet<Label> {
        self.labels.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Table – raw string cells addressed by column name
// ---------------------------------------------------------------------------

/// A column-oriented table of raw cells, used by schemas that name their
/// columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl Table {
    pub fn new(names: &[&str]) -> Self {
        Table {
            names: names.iter().map(|n| n.to_string()).collect(),
            columns: vec![Vec::new(); names.len()],
        }
    }

    /// Append one row; its width must match the schema.
    pub fn push_row<'a>(&mut self, cells: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let cells: Vec<&str> = cells.into_iter().collect();
        if cells.len() != self.names.len() {
            return Err(DataError::Format(format!(
                "row {} has {} fields, schema has {}",
                self.len(),
                cells.len(),
                self.names.len()
            )));
        }
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.push(cell.to_string());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Remove the named columns.  Unknown names are a format error.
    pub fn drop_columns(&mut self, drop: &[&str]) -> Result<()> {
        for name in drop {
            let idx = self
                .names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| DataError::Format(format!("no column named '{name}'")))?;
            self.names.remove(idx);
            self.columns.remove(idx);
        }
        Ok(())
    }

    /// Parse a column as floats.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let cells = self
            .column(name)
            .ok_or_else(|| DataError::Format(format!("no column named '{name}'")))?;
        cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.parse::<f64>().map_err(|_| {
                    DataError::Format(format!("row {row}, {name}: '{cell}' is not a number"))
                })
            })
            .collect()
    }
}
