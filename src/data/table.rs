use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream (hue color assignment) so
/// `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Timestamp(NaiveDateTime),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Timestamp(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Timestamp(t) => t.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for statistics and plotting.
    /// Timestamps are excluded; see [`CellValue::as_axis_f64`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Interpret the value as an x-axis coordinate. Timestamps map to Unix
    /// seconds so they can share an axis with numeric columns.
    pub fn as_axis_f64(&self) -> Option<f64> {
        match self {
            CellValue::Timestamp(t) => Some(t.and_utc().timestamp() as f64),
            other => other.as_f64(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the tag produced by the typing pass
// ---------------------------------------------------------------------------

/// Inferred type of a column, assigned once at ingest and consumed uniformly
/// by cleaning and plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
    Temporal,
    Unknown,
}

/// Tag a column from its cell values, ignoring nulls:
/// * any text cell → `Text`
/// * only timestamps → `Temporal`
/// * only numbers/bools → `Numeric`
/// * all null, or numeric/temporal mixtures → `Unknown`
pub fn infer_column_type(values: &[CellValue]) -> ColumnType {
    let mut saw_numeric = false;
    let mut saw_text = false;
    let mut saw_temporal = false;

    for value in values {
        match value {
            CellValue::Null => {}
            CellValue::Text(_) => saw_text = true,
            CellValue::Timestamp(_) => saw_temporal = true,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Bool(_) => {
                saw_numeric = true;
            }
        }
    }

    match (saw_text, saw_temporal, saw_numeric) {
        (true, _, _) => ColumnType::Text,
        (false, true, false) => ColumnType::Temporal,
        (false, false, true) => ColumnType::Numeric,
        _ => ColumnType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// One named, typed column.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, running the typing pass over its values.
    pub fn new(name: String, values: Vec<CellValue>) -> Self {
        let ty = infer_column_type(&values);
        Column { name, ty, values }
    }
}

/// The full parsed table. Immutable after construction: cleaning and
/// selection always produce new values, never mutate in place.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Assemble a table from columns. Callers are responsible for producing
    /// unique names and equal row counts; both are asserted here.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns
                .windows(2)
                .all(|w| w[0].values.len() == w[1].values.len()),
            "column row counts differ"
        );
        debug_assert!(
            {
                let mut names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
                names.sort_unstable();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "duplicate column names"
        );
        Table { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Exact, case-sensitive name lookup.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::Timestamp(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_time(chrono::NaiveTime::MIN),
        )
    }

    #[test]
    fn test_infer_numeric_column() {
        let values = vec![
            CellValue::Integer(1),
            CellValue::Float(2.5),
            CellValue::Null,
            CellValue::Bool(true),
        ];
        assert_eq!(infer_column_type(&values), ColumnType::Numeric);
    }

    #[test]
    fn test_infer_text_wins_over_numbers() {
        let values = vec![CellValue::Integer(1), CellValue::Text("abc".into())];
        assert_eq!(infer_column_type(&values), ColumnType::Text);
    }

    #[test]
    fn test_infer_temporal_column() {
        let values = vec![ts(2023, 1, 1), CellValue::Null, ts(2023, 1, 2)];
        assert_eq!(infer_column_type(&values), ColumnType::Temporal);
    }

    #[test]
    fn test_infer_all_null_is_unknown() {
        assert_eq!(
            infer_column_type(&[CellValue::Null, CellValue::Null]),
            ColumnType::Unknown
        );
        assert_eq!(infer_column_type(&[]), ColumnType::Unknown);
    }

    #[test]
    fn test_infer_numeric_temporal_mix_is_unknown() {
        let values = vec![CellValue::Float(1.0), ts(2023, 1, 1)];
        assert_eq!(infer_column_type(&values), ColumnType::Unknown);
    }

    #[test]
    fn test_axis_value_of_timestamp() {
        let v = ts(1970, 1, 2);
        assert_eq!(v.as_axis_f64(), Some(86_400.0));
        assert_eq!(v.as_f64(), None);
    }

    #[test]
    fn test_table_lookup_is_case_sensitive() {
        let table = Table::from_columns(vec![Column::new(
            "Time".into(),
            vec![CellValue::Integer(1)],
        )]);
        assert!(table.has_column("Time"));
        assert!(!table.has_column("time"));
    }
}
