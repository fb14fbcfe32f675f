//! KDD Cup 1999 (10% subset): network connection records labelled
//! `normal.` or with an attack type.

use std::collections::BTreeMap;

use log::{debug, info};

use super::{init_loader, StreamDataset};
use crate::config::LoaderConfig;
use crate::data::loader::read_table;
use crate::data::model::{Dataset, Label, Table};
use crate::data::preprocess::{LabelEncoder, OneHotEncoder};
use crate::error::{DataError, Result};
use crate::state::DataLoader;

/// Column schema injected on the headerless raw file.
pub const COLUMNS: [&str; 42] = [
    "duration",
    "protocol_type",
    "service",
    "flag",
    "src_bytes",
    "dst_bytes",
    "land",
    "wrong_fragment",
    "urgent",
    "hot",
    "num_failed_logins",
    "logged_in",
    "num_compromised",
    "root_shell",
    "su_attempted",
    "num_root",
    "num_file_creations",
    "num_shells",
    "num_access_files",
    "num_outbound_cmds",
    "is_host_login",
    "is_guest_login",
    "count",
    "srv_count",
    "serror_rate",
    "srv_serror_rate",
    "rerror_rate",
    "srv_rerror_rate",
    "same_srv_rate",
    "diff_srv_rate",
    "srv_diff_host_rate",
    "dst_host_count",
    "dst_host_srv_count",
    "dst_host_same_srv_rate",
    "dst_host_diff_srv_rate",
    "dst_host_same_src_port_rate",
    "dst_host_srv_diff_host_rate",
    "dst_host_serror_rate",
    "dst_host_srv_serror_rate",
    "dst_host_rerror_rate",
    "dst_host_srv_rerror_rate",
    "label",
];

/// Constant in the 10% subset; dropped before building features.
pub const USELESS_COLUMNS: [&str; 2] = ["num_outbound_cmds", "is_host_login"];

/// Categorical columns, label included.
pub const SYMBOLIC_COLUMNS: [&str; 4] = ["protocol_type", "service", "flag", "label"];

pub const LABEL_COLUMN: &str = "label";

// ---------------------------------------------------------------------------
// Symbolic encoder registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct EncodedColumn {
    encoder: LabelEncoder,
    codes: Vec<usize>,
}

/// One label encoder slot per declared symbolic column.  A slot is filled
/// at most once, when its column is encoded.
#[derive(Debug, Clone)]
pub struct SymbolicEncoders {
    slots: BTreeMap<&'static str, Option<EncodedColumn>>,
}

impl SymbolicEncoders {
    pub fn declare(columns: &[&'static str]) -> Self {
        Self {
            slots: columns.iter().map(|&c| (c, None)).collect(),
        }
    }

    /// Fit the column's encoder and return the integer codes.
    pub fn encode(&mut self, column: &str, values: &[String]) -> Result<&[usize]> {
        let slot = self
            .slots
            .get_mut(column)
            .ok_or_else(|| DataError::State(format!("'{column}' is not a symbolic column")))?;
        if slot.is_some() {
            return Err(DataError::State(format!("'{column}' is already encoded")));
        }
        let (encoder, codes) = LabelEncoder::fit_transform(values);
        debug!("encoded '{column}' into {} categories", encoder.classes().len());
        Ok(&slot.insert(EncodedColumn { encoder, codes }).codes)
    }

    pub fn is_encoded(&self, column: &str) -> bool {
        matches!(self.slots.get(column), Some(Some(_)))
    }

    pub fn encoder(&self, column: &str) -> Result<&LabelEncoder> {
        self.encoded(column).map(|c| &c.encoder)
    }

    /// The original strings of an encoded column, in record order.
    pub fn inverse_encode(&self, column: &str) -> Result<Vec<String>> {
        let encoded = self.encoded(column)?;
        encoded.encoder.inverse_transform(&encoded.codes)
    }

    /// Decode arbitrary codes with the column's encoder.
    pub fn decode(&self, column: &str, codes: &[usize]) -> Result<Vec<String>> {
        self.encoded(column)?.encoder.inverse_transform(codes)
    }

    fn encoded(&self, column: &str) -> Result<&EncodedColumn> {
        self.slots
            .get(column)
            .and_then(Option::as_ref)
            .ok_or_else(|| DataError::State(format!("column '{column}' was never encoded")))
    }
}

// ---------------------------------------------------------------------------
// KddCupLoader
// ---------------------------------------------------------------------------

/// Headerless KDD Cup file → encoded, split partitions.
///
/// With `dummies` the symbolic features are one-hot encoded and the
/// partitions are min-max normalized.  Without it they are integer-encoded
/// in place and left unscaled.
#[derive(Debug)]
pub struct KddCupLoader {
    loader: DataLoader,
    encoders: SymbolicEncoders,
    feature_names: Vec<String>,
}

impl KddCupLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let mut encoders = SymbolicEncoders::declare(&SYMBOLIC_COLUMNS);
        let mut feature_names = Vec::new();

        let loader = init_loader(config, |loader| {
            let mut table = read_table(&config.data_path, &COLUMNS)?;
            table.drop_columns(&USELESS_COLUMNS)?;

            let (dataset, names) = if config.dummies {
                build_one_hot(&table, &mut encoders)?
            } else {
                build_ordinal(&table, &mut encoders)?
            };
            feature_names = names;

            loader.set_dataset(dataset)?;
            loader.split(config.percentage_historical_data)?;
            if config.dummies {
                loader.normalize()?;
            }
            Ok(())
        })?;

        info!(
            "KDD Cup ready: {} historical, {} stream records, {} features",
            loader.get_historical_data().1.len(),
            loader.get_stream_data().1.len(),
            feature_names.len()
        );
        Ok(Self {
            loader,
            encoders,
            feature_names,
        })
    }

    /// Names of the feature columns, in X order.  Empty after a cache load.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn encoders(&self) -> &SymbolicEncoders {
        &self.encoders
    }

    /// Recover the original strings of an integer-encoded symbolic column.
    pub fn inverse_encode(&self, column: &str) -> Result<Vec<String>> {
        self.encoders.inverse_encode(column)
    }

    /// Decode codes taken from a feature or label column.
    pub fn decode(&self, column: &str, codes: &[usize]) -> Result<Vec<String>> {
        self.encoders.decode(column, codes)
    }
}

impl StreamDataset for KddCupLoader {
    fn name(&self) -> &'static str {
        "kdd_cup"
    }

    fn loader(&self) -> &DataLoader {
        &self.loader
    }
}

fn column<'a>(table: &'a Table, name: &str) -> Result<&'a [String]> {
    table
        .column(name)
        .ok_or_else(|| DataError::Format(format!("no column named '{name}'")))
}

/// Integer-encode the label column.
fn encode_labels(table: &Table, encoders: &mut SymbolicEncoders) -> Result<Vec<Label>> {
    let codes = encoders.encode(LABEL_COLUMN, column(table, LABEL_COLUMN)?)?;
    Ok(codes.iter().map(|&c| Label::Integer(c as i64)).collect())
}

/// Numeric columns sorted by name, then one indicator column per value of
/// each symbolic feature (features sorted by name, values sorted).
fn build_one_hot(table: &Table, encoders: &mut SymbolicEncoders) -> Result<(Dataset, Vec<String>)> {
    let mut names: Vec<&String> = table.names().iter().collect();
    names.sort();

    let mut rows: Vec<Vec<f64>> = vec![Vec::new(); table.len()];
    let mut feature_names = Vec::new();

    for name in names.iter().filter(|n| !SYMBOLIC_COLUMNS.contains(&n.as_str())) {
        for (row, v) in rows.iter_mut().zip(table.numeric_column(name)?) {
            row.push(v);
        }
        feature_names.push(name.to_string());
    }

    for name in names.iter().filter(|n| {
        SYMBOLIC_COLUMNS.contains(&n.as_str()) && n.as_str() != LABEL_COLUMN
    }) {
        let values = column(table, name)?;
        let encoder = OneHotEncoder::fit(values);
        for (row, indicators) in rows.iter_mut().zip(encoder.transform(values)?) {
            row.extend(indicators);
        }
        feature_names.extend(encoder.feature_names(name));
    }

    let labels = encode_labels(table, encoders)?;
    Ok((Dataset::new(rows, labels)?, feature_names))
}

/// Every column except the label, sorted by name, with symbolic columns
/// replaced by their integer codes.
fn build_ordinal(table: &Table, encoders: &mut SymbolicEncoders) -> Result<(Dataset, Vec<String>)> {
    let mut names: Vec<&String> = table.names().iter().collect();
    names.sort();

    let mut rows: Vec<Vec<f64>> = vec![Vec::new(); table.len()];
    let mut feature_names = Vec::new();

    for name in names.iter().filter(|n| n.as_str() != LABEL_COLUMN) {
        let values: Vec<f64> = if SYMBOLIC_COLUMNS.contains(&name.as_str()) {
            let codes = encoders.encode(name, column(table, name)?)?;
            codes.iter().map(|&c| c as f64).collect()
        } else {
            table.numeric_column(name)?
        };
        for (row, v) in rows.iter_mut().zip(values) {
            row.push(v);
        }
        feature_names.push(name.to_string());
    }

    let labels = encode_labels(table, encoders)?;
    Ok((Dataset::new(rows, labels)?, feature_names))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn small_table() -> Table {
        let mut table = Table::new(&["src_bytes", "protocol_type", "flag", "label"]);
        table.push_row(["100", "tcp", "SF", "normal."]).unwrap();
        table.push_row(["0", "udp", "REJ", "smurf."]).unwrap();
        table.push_row(["50", "tcp", "SF", "normal."]).unwrap();
        table
    }

    #[test]
    fn test_registry_rejects_undeclared_and_double_encoding() {
        let mut encoders = SymbolicEncoders::declare(&SYMBOLIC_COLUMNS);
        let values = strings(&["tcp", "udp"]);
        assert!(matches!(
            encoders.encode("src_bytes", &values),
            Err(DataError::State(_))
        ));
        encoders.encode("protocol_type", &values).unwrap();
        assert!(matches!(
            encoders.encode("protocol_type", &values),
            Err(DataError::State(_))
        ));
    }

    #[test]
    fn test_inverse_encode_requires_encoding() {
        let encoders = SymbolicEncoders::declare(&SYMBOLIC_COLUMNS);
        assert!(!encoders.is_encoded("service"));
        assert!(matches!(
            encoders.inverse_encode("service"),
            Err(DataError::State(_))
        ));
    }

    #[test]
    fn test_build_one_hot_layout() {
        let mut encoders = SymbolicEncoders::declare(&SYMBOLIC_COLUMNS);
        let (dataset, names) = build_one_hot(&small_table(), &mut encoders).unwrap();

        assert_eq!(
            names,
            strings(&["src_bytes", "flag_REJ", "flag_SF", "protocol_type_tcp", "protocol_type_udp"])
        );
        assert_eq!(dataset.features[0], vec![100.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(dataset.features[1], vec![0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            dataset.labels,
            vec![Label::Integer(0), Label::Integer(1), Label::Integer(0)]
        );

        // only the label is integer-encoded in this mode
        assert!(encoders.is_encoded(LABEL_COLUMN));
        assert!(!encoders.is_encoded("flag"));
    }

    #[test]
    fn test_build_ordinal_layout_and_round_trip() {
        let mut encoders = SymbolicEncoders::declare(&SYMBOLIC_COLUMNS);
        let table = small_table();
        let (dataset, names) = build_ordinal(&table, &mut encoders).unwrap();

        assert_eq!(names, strings(&["flag", "protocol_type", "src_bytes"]));
        assert_eq!(dataset.features[0], vec![1.0, 0.0, 100.0]);
        assert_eq!(dataset.features[1], vec![0.0, 1.0, 0.0]);

        for name in ["flag", "protocol_type", "label"] {
            assert_eq!(
                encoders.inverse_encode(name).unwrap(),
                table.column(name).unwrap().to_vec()
            );
        }
        assert_eq!(encoders.decode("flag", &[1, 0]).unwrap(), strings(&["SF", "REJ"]));
    }

    #[test]
    fn test_build_one_hot_rejects_non_numeric() {
        let mut table = Table::new(&["src_bytes", "flag", "label"]);
        table.push_row(["lots", "SF", "normal."]).unwrap();
        let mut encoders = SymbolicEncoders::declare(&SYMBOLIC_COLUMNS);
        assert!(matches!(
            build_one_hot(&table, &mut encoders),
            Err(DataError::Format(_))
        ));
    }
}
