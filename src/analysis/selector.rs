// ---------------------------------------------------------------------------
// Plot eligibility and planning
// ---------------------------------------------------------------------------

/// Name of the column that unlocks the time-series plots. Matched exactly,
/// case-sensitive.
pub const TIME_COLUMN: &str = "time";

/// Rotation applied to the x-tick labels of every time-series plot.
pub const TICK_ROTATION_DEG: f32 = 45.0;

/// Number of bins used by the histogram plots.
pub const HISTOGRAM_BINS: usize = 10;

/// One "show X" checkbox per plot family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotToggles {
    pub pair_grid: bool,
    pub heatmap: bool,
    pub time_series: bool,
    pub histograms: bool,
    pub scatter: bool,
}

/// Which plot families the current selection allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Eligibility {
    /// At least two columns selected. Gates every plot family.
    pub any: bool,
    /// `any` and the table carries a column literally named `time`.
    pub time_series: bool,
    /// At least three columns selected.
    pub scatter: bool,
}

/// Evaluate the eligibility rules for the current selection.
pub fn eligibility(selection: &[String], has_time_column: bool) -> Eligibility {
    let any = selection.len() >= 2;
    Eligibility {
        any,
        time_series: any && has_time_column,
        scatter: selection.len() >= 3,
    }
}

/// One configured, transient render instruction. Rebuilt from widget state
/// on every pass and never cached.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotRequest {
    /// Full matrix of every selected column against every other; the
    /// diagonal shows each column's own distribution.
    PairGrid { columns: Vec<String> },
    /// Pearson correlation across exactly the selected columns, rendered as
    /// annotated colored cells.
    CorrelationHeatmap { columns: Vec<String> },
    /// One line plot: x = the chosen time axis, y = `column`.
    TimeSeries {
        time_axis: String,
        column: String,
        tick_rotation_deg: f32,
    },
    /// One histogram for a single selected column.
    Histogram { column: String },
    /// A single scatter plot: x/y are the first/second selected columns in
    /// click order, with color and marker size driven by two further columns.
    ScatterHueSize {
        x: String,
        y: String,
        hue: String,
        size: String,
    },
}

/// Map the current widget state to the list of plots to draw, in display
/// order: pair matrix, heatmap, time series, histograms, scatter.
///
/// `selection` is ordered by click time; that order decides the scatter
/// axes and the hue/size defaults. `time_axis` may name any table column,
/// not just a selected one.
pub fn plan_plots(
    selection: &[String],
    toggles: &PlotToggles,
    has_time_column: bool,
    time_axis: Option<&str>,
    hue: Option<&str>,
    size: Option<&str>,
) -> Vec<PlotRequest> {
    let elig = eligibility(selection, has_time_column);
    let mut requests = Vec::new();
    if !elig.any {
        return requests;
    }

    if toggles.pair_grid {
        requests.push(PlotRequest::PairGrid {
            columns: selection.to_vec(),
        });
    }

    if toggles.heatmap {
        requests.push(PlotRequest::CorrelationHeatmap {
            columns: selection.to_vec(),
        });
    }

    if toggles.time_series && elig.time_series {
        if let Some(axis) = time_axis {
            for column in selection.iter().filter(|c| c.as_str() != axis) {
                requests.push(PlotRequest::TimeSeries {
                    time_axis: axis.to_string(),
                    column: column.clone(),
                    tick_rotation_deg: TICK_ROTATION_DEG,
                });
            }
        }
    }

    if toggles.histograms {
        for column in selection {
            requests.push(PlotRequest::Histogram {
                column: column.clone(),
            });
        }
    }

    if toggles.scatter && elig.scatter {
        let hue = hue.unwrap_or(selection[0].as_str());
        let size = size.unwrap_or(selection[1].as_str());
        requests.push(PlotRequest::ScatterHueSize {
            x: selection[0].clone(),
            y: selection[1].clone(),
            hue: hue.to_string(),
            size: size.to_string(),
        });
    }

    requests
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn all_on() -> PlotToggles {
        PlotToggles {
            pair_grid: true,
            heatmap: true,
            time_series: true,
            histograms: true,
            scatter: true,
        }
    }

    #[test]
    fn test_nothing_renders_below_two_selected() {
        let requests = plan_plots(&sel(&["A"]), &all_on(), true, Some("time"), None, None);
        assert!(requests.is_empty());
        let requests = plan_plots(&sel(&[]), &all_on(), true, Some("time"), None, None);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_two_columns_without_time_column() {
        let elig = eligibility(&sel(&["A", "B"]), false);
        assert!(elig.any);
        assert!(!elig.time_series);
        assert!(!elig.scatter);

        // Time-series toggle is a no-op when the table has no `time` column.
        let toggles = PlotToggles {
            time_series: true,
            histograms: true,
            ..Default::default()
        };
        let requests = plan_plots(&sel(&["A", "B"]), &toggles, false, Some("A"), None, None);
        assert_eq!(
            requests,
            vec![
                PlotRequest::Histogram { column: "A".into() },
                PlotRequest::Histogram { column: "B".into() },
            ]
        );
    }

    #[test]
    fn test_scatter_axes_follow_click_order() {
        let toggles = PlotToggles {
            scatter: true,
            ..Default::default()
        };
        let requests = plan_plots(&sel(&["B", "A", "C"]), &toggles, false, None, None, None);
        assert_eq!(
            requests,
            vec![PlotRequest::ScatterHueSize {
                x: "B".into(),
                y: "A".into(),
                hue: "B".into(),
                size: "A".into(),
            }]
        );
    }

    #[test]
    fn test_scatter_requires_three_columns() {
        let toggles = PlotToggles {
            scatter: true,
            ..Default::default()
        };
        let requests = plan_plots(&sel(&["A", "B"]), &toggles, false, None, None, None);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_scatter_explicit_hue_and_size() {
        let toggles = PlotToggles {
            scatter: true,
            ..Default::default()
        };
        let requests = plan_plots(
            &sel(&["A", "B", "C"]),
            &toggles,
            false,
            None,
            Some("C"),
            Some("B"),
        );
        assert_eq!(
            requests,
            vec![PlotRequest::ScatterHueSize {
                x: "A".into(),
                y: "B".into(),
                hue: "C".into(),
                size: "B".into(),
            }]
        );
    }

    #[test]
    fn test_time_series_one_plot_per_non_axis_column() {
        let toggles = PlotToggles {
            time_series: true,
            ..Default::default()
        };
        let requests = plan_plots(
            &sel(&["X", "Y"]),
            &toggles,
            true,
            Some("time"),
            None,
            None,
        );
        assert_eq!(
            requests,
            vec![
                PlotRequest::TimeSeries {
                    time_axis: "time".into(),
                    column: "X".into(),
                    tick_rotation_deg: 45.0,
                },
                PlotRequest::TimeSeries {
                    time_axis: "time".into(),
                    column: "Y".into(),
                    tick_rotation_deg: 45.0,
                },
            ]
        );
    }

    #[test]
    fn test_time_series_skips_the_axis_column_itself() {
        let toggles = PlotToggles {
            time_series: true,
            ..Default::default()
        };
        let requests = plan_plots(
            &sel(&["time", "Y"]),
            &toggles,
            true,
            Some("time"),
            None,
            None,
        );
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            PlotRequest::TimeSeries {
                time_axis: "time".into(),
                column: "Y".into(),
                tick_rotation_deg: 45.0,
            }
        );
    }

    #[test]
    fn test_display_order_is_fixed() {
        let requests = plan_plots(
            &sel(&["A", "B", "C"]),
            &all_on(),
            true,
            Some("A"),
            None,
            None,
        );
        let kinds: Vec<&str> = requests
            .iter()
            .map(|r| match r {
                PlotRequest::PairGrid { .. } => "pair",
                PlotRequest::CorrelationHeatmap { .. } => "heatmap",
                PlotRequest::TimeSeries { .. } => "time",
                PlotRequest::Histogram { .. } => "hist",
                PlotRequest::ScatterHueSize { .. } => "scatter",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["pair", "heatmap", "time", "time", "hist", "hist", "hist", "scatter"]
        );
    }

    #[test]
    fn test_pair_grid_and_heatmap_cover_exact_selection() {
        let toggles = PlotToggles {
            pair_grid: true,
            heatmap: true,
            ..Default::default()
        };
        let requests = plan_plots(&sel(&["C", "A"]), &toggles, false, None, None, None);
        assert_eq!(
            requests,
            vec![
                PlotRequest::PairGrid {
                    columns: sel(&["C", "A"])
                },
                PlotRequest::CorrelationHeatmap {
                    columns: sel(&["C", "A"])
                },
            ]
        );
    }
}
