use std::sync::OnceLock;

use regex::Regex;

use super::table::{CellValue, Column, ColumnType, Table};

// ---------------------------------------------------------------------------
// Text-column normalization
// ---------------------------------------------------------------------------

/// Matches every character that is not an ASCII letter, digit, or whitespace.
fn non_alphanumeric() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("valid regex literal"))
}

/// Strip special characters from a single text value.
pub fn strip_special(s: &str) -> String {
    non_alphanumeric().replace_all(s, "").into_owned()
}

/// Produce a new table with every text cell of every `Text`-typed column
/// scrubbed of special characters. Nulls and non-text columns pass through
/// untouched, so cleaning an already-cleaned table is a no-op.
pub fn clean_table(table: &Table) -> Table {
    let columns = table
        .columns()
        .iter()
        .map(|col| {
            if col.ty != ColumnType::Text {
                return col.clone();
            }
            let values = col
                .values
                .iter()
                .map(|value| match value {
                    CellValue::Text(s) => CellValue::Text(strip_special(s)),
                    other => other.clone(),
                })
                .collect();
            Column {
                name: col.name.clone(),
                ty: col.ty,
                values,
            }
        })
        .collect();
    Table::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(
            name.to_string(),
            values
                .iter()
                .map(|s| CellValue::Text(s.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_strip_special_keeps_alphanumerics_and_whitespace() {
        assert_eq!(strip_special("Well-7 #2 (A/B)"), "Well7 2 AB");
        assert_eq!(strip_special("no_change here"), "nochange here");
        assert_eq!(strip_special("tab\tand newline\n"), "tab\tand newline\n");
        assert_eq!(strip_special("$%&"), "");
    }

    #[test]
    fn test_clean_only_touches_text_columns() {
        let table = Table::from_columns(vec![
            text_column("well", &["W-1", "W-2"]),
            Column::new(
                "depth".into(),
                vec![CellValue::Float(1.5), CellValue::Float(2.5)],
            ),
        ]);
        let cleaned = clean_table(&table);

        let well = cleaned.column("well").unwrap();
        assert_eq!(well.values[0], CellValue::Text("W1".into()));
        let depth = cleaned.column("depth").unwrap();
        assert_eq!(depth.values, table.column("depth").unwrap().values);
    }

    #[test]
    fn test_clean_preserves_nulls() {
        let table = Table::from_columns(vec![Column::new(
            "note".into(),
            vec![CellValue::Text("a!b".into()), CellValue::Null],
        )]);
        let cleaned = clean_table(&table);
        let note = cleaned.column("note").unwrap();
        assert_eq!(note.values[0], CellValue::Text("ab".into()));
        assert_eq!(note.values[1], CellValue::Null);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let table = Table::from_columns(vec![text_column("note", &["x?y!", "plain"])]);
        let once = clean_table(&table);
        let twice = clean_table(&once);
        for (a, b) in once
            .column("note")
            .unwrap()
            .values
            .iter()
            .zip(&twice.column("note").unwrap().values)
        {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_cleaned_cells_contain_only_allowed_characters() {
        let table = Table::from_columns(vec![text_column("s", &["a$b c_1", "Ωmega-3"])]);
        let cleaned = clean_table(&table);
        for value in &cleaned.column("s").unwrap().values {
            if let CellValue::Text(s) = value {
                assert!(s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace()));
            }
        }
    }
}
