/// Data layer: core types, ingestion, and text cleanup.
///
/// Architecture:
/// ```text
///  .xlsx / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  ingest   │  suffix dispatch → parse → typing pass
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named, typed columns (Numeric | Text | Temporal | Unknown)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  strip special characters from text columns → new Table
///   └──────────┘
/// ```
pub mod clean;
pub mod ingest;
pub mod table;
