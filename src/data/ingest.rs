use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::clean::clean_table;
use super::table::{CellValue, Column, Table};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Load failures, split the way the UI needs them: an unsupported suffix is
/// reported inline and the app carries on, while decoder failures surface
/// through the generic error path with their full context chain.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type: .{0}")]
    UnsupportedFormat(String),
    #[error("{0:#}")]
    Parse(#[from] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a well-log table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` – first worksheet, first row is the header, cell types native
/// * `.csv`  – comma-delimited, thousands separators tolerated in numbers
///
/// Text columns are cleaned (non-alphanumeric characters stripped) before
/// the table is returned.
pub fn load_file(path: &Path) -> Result<Table, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" => load_xlsx(path)?,
        "csv" => load_csv(path)?,
        other => return Err(IngestError::UnsupportedFormat(other.to_string())),
    };

    Ok(clean_table(&table))
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Load the first worksheet of an Excel workbook. The first row supplies the
/// column names; every other row is data with cell types taken as-is from
/// the spreadsheet.
fn load_xlsx(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path).context("opening Excel workbook")?;

    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => format!("column_{i}"),
                other => format!("{other}"),
            })
            .collect(),
        None => Vec::new(),
    };
    let names = disambiguate_headers(header);

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, slot) in columns.iter_mut().enumerate() {
            let value = row.get(i).map_or(CellValue::Null, excel_cell_value);
            slot.push(value);
        }
    }

    Ok(build_table(names, columns))
}

fn excel_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::Timestamp)
            .unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) => parse_temporal(s)
            .map(CellValue::Timestamp)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening CSV file")?;
    read_csv(file)
}

/// Parse comma-delimited text. Field splitting happens first (the comma stays
/// the delimiter); only afterwards is each field coerced, so a quoted
/// `"1,234.5"` becomes the number 1234.5.
fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(reader);

    let header: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let names = disambiguate_headers(header);

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (i, slot) in columns.iter_mut().enumerate() {
            slot.push(parse_csv_field(record.get(i).unwrap_or("")));
        }
    }

    Ok(build_table(names, columns))
}

/// Coerce one CSV field: empty → null, then integer, float,
/// thousands-separated number, timestamp, and finally text.
fn parse_csv_field(field: &str) -> CellValue {
    let s = field.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if let Some(value) = parse_thousands(s) {
        return value;
    }
    if let Some(ts) = parse_temporal(s) {
        return CellValue::Timestamp(ts);
    }
    CellValue::Text(s.to_string())
}

/// Treat commas inside a field as thousands separators: strip them and
/// re-parse. Any comma placement is accepted, matching the loose behavior
/// of spreadsheet importers.
fn parse_thousands(s: &str) -> Option<CellValue> {
    if !s.contains(',') {
        return None;
    }
    let stripped: String = s.chars().filter(|&c| c != ',').collect();
    if let Ok(i) = stripped.parse::<i64>() {
        return Some(CellValue::Integer(i));
    }
    if let Ok(f) = stripped.parse::<f64>() {
        return Some(CellValue::Float(f));
    }
    None
}

/// Date/time formats tried, most specific first.
const TEMPORAL_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

fn parse_temporal(s: &str) -> Option<NaiveDateTime> {
    for fmt in TEMPORAL_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Keep the unique-name invariant: later duplicates of a header become
/// `name.1`, `name.2`, …
fn disambiguate_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    raw.into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name.clone()
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

fn build_table(names: Vec<String>, columns: Vec<Vec<CellValue>>) -> Table {
    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::from_columns(columns)
}
