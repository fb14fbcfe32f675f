/// Data layer: core types, raw readers, preprocessing and the binary cache.
///
/// Architecture:
/// ```text
///  headerless .csv / .data
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read records → raw cells / Table
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ preprocess  │  label / one-hot encoding, min-max scaling
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  Dataset { features, labels }
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  write-once bincode bundle
///   └──────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
pub mod preprocess;
