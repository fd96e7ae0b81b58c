use crate::data::table::Table;

// ---------------------------------------------------------------------------
// Pearson correlation
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient of two equal-length samples.
/// Returns `None` for fewer than two pairs or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some(cov / denom)
}

/// Rows of `a` and `b` where both cells are numeric (pairwise-complete
/// observations).
pub fn paired_values(table: &Table, a: &str, b: &str) -> Vec<[f64; 2]> {
    let (Some(col_a), Some(col_b)) = (table.column(a), table.column(b)) else {
        return Vec::new();
    };
    col_a
        .values
        .iter()
        .zip(&col_b.values)
        .filter_map(|(va, vb)| Some([va.as_f64()?, vb.as_f64()?]))
        .collect()
}

/// All numeric values of one column, nulls and text skipped.
pub fn numeric_values(table: &Table, name: &str) -> Vec<f64> {
    table
        .column(name)
        .map(|col| col.values.iter().filter_map(|v| v.as_f64()).collect())
        .unwrap_or_default()
}

/// Pairwise linear correlation across exactly the given columns, in the
/// given order. Non-numeric pairs yield `None`.
pub fn correlation_matrix(table: &Table, columns: &[String]) -> Vec<Vec<Option<f64>>> {
    columns
        .iter()
        .map(|a| {
            columns
                .iter()
                .map(|b| {
                    let pairs = paired_values(table, a, b);
                    let xs: Vec<f64> = pairs.iter().map(|p| p[0]).collect();
                    let ys: Vec<f64> = pairs.iter().map(|p| p[1]).collect();
                    pearson(&xs, &ys)
                })
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// Equal-width histogram: `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        if self.edges.len() < 2 {
            0.0
        } else {
            self.edges[1] - self.edges[0]
        }
    }

    pub fn bin_center(&self, i: usize) -> f64 {
        (self.edges[i] + self.edges[i + 1]) / 2.0
    }
}

/// Bin finite values into `bins` equal-width buckets over their full range.
/// Returns `None` when there is nothing to bin. A constant sample collapses
/// to a single unit-width bin.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return None;
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return Some(Histogram {
            edges: vec![min - 0.5, min + 0.5],
            counts: vec![finite.len()],
        });
    }

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in finite {
        // The maximum lands in the last bin, matching the usual convention.
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{CellValue, Column, Table};

    fn numeric_table() -> Table {
        Table::from_columns(vec![
            Column::new(
                "a".into(),
                vec![
                    CellValue::Float(1.0),
                    CellValue::Float(2.0),
                    CellValue::Float(3.0),
                ],
            ),
            Column::new(
                "b".into(),
                vec![
                    CellValue::Float(2.0),
                    CellValue::Float(4.0),
                    CellValue::Float(6.0),
                ],
            ),
            Column::new(
                "c".into(),
                vec![
                    CellValue::Float(3.0),
                    CellValue::Float(2.0),
                    CellValue::Float(1.0),
                ],
            ),
            Column::new(
                "label".into(),
                vec![
                    CellValue::Text("x".into()),
                    CellValue::Text("y".into()),
                    CellValue::Text("z".into()),
                ],
            ),
        ])
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_inputs() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_correlation_matrix_shape_and_diagonal() {
        let table = numeric_table();
        let cols = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let matrix = correlation_matrix(&table, &cols);

        assert_eq!(matrix.len(), 3);
        for row in &matrix {
            assert_eq!(row.len(), 3);
        }
        for i in 0..3 {
            assert!((matrix[i][i].unwrap() - 1.0).abs() < 1e-12);
        }
        assert!((matrix[0][1].unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix[0][2].unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_with_text_column_is_none() {
        let table = numeric_table();
        let cols = vec!["a".to_string(), "label".to_string()];
        let matrix = correlation_matrix(&table, &cols);
        assert_eq!(matrix[0][1], None);
        assert_eq!(matrix[1][1], None);
    }

    #[test]
    fn test_paired_values_skip_incomplete_rows() {
        let table = Table::from_columns(vec![
            Column::new(
                "a".into(),
                vec![CellValue::Float(1.0), CellValue::Null, CellValue::Float(3.0)],
            ),
            Column::new(
                "b".into(),
                vec![CellValue::Float(10.0), CellValue::Float(20.0), CellValue::Null],
            ),
        ]);
        assert_eq!(paired_values(&table, "a", "b"), vec![[1.0, 10.0]]);
    }

    #[test]
    fn test_histogram_counts_and_edges() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], 5).unwrap();
        assert_eq!(h.counts, vec![2, 2, 2, 2, 2]);
        assert_eq!(h.edges.len(), 6);
        assert!((h.bin_width() - 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_constant_sample() {
        let h = histogram(&[4.2, 4.2, 4.2], 10).unwrap();
        assert_eq!(h.counts, vec![3]);
        assert_eq!(h.edges.len(), 2);
    }

    #[test]
    fn test_histogram_empty_input() {
        assert_eq!(histogram(&[], 10), None);
        assert_eq!(histogram(&[f64::NAN], 10), None);
    }
}
