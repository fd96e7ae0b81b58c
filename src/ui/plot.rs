use std::collections::BTreeSet;

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Ui, Vec2,
    epaint::TextShape,
};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::analysis::selector::{self, PlotRequest};
use crate::analysis::stats;
use crate::color::{self, ColorMap};
use crate::data::table::{CellValue, ColumnType, Table};
use crate::state::AppState;

const PREVIEW_ROWS: usize = 200;
const MINI_PLOT_SIZE: Vec2 = Vec2::new(170.0, 150.0);

// ---------------------------------------------------------------------------
// Central panel – data preview and planned plots
// ---------------------------------------------------------------------------

/// Render the central analysis panel: the table preview followed by every
/// plot the selector planned for the current widget state.
pub fn analysis_panel(ui: &mut Ui, state: &AppState) {
    let table = match &state.table {
        Some(t) => t,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a well-log file to begin  (File → Open…)");
            });
            return;
        }
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(RichText::new("Data").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    data_preview(ui, table);
                });

            // Plans are rebuilt every frame from the widget state; toggling
            // a plot off and on recomputes it from scratch.
            let requests = selector::plan_plots(
                &state.selection,
                &state.toggles,
                table.has_column(selector::TIME_COLUMN),
                state.time_axis.as_deref(),
                state.hue_column.as_deref(),
                state.size_column.as_deref(),
            );

            for request in &requests {
                ui.separator();
                match request {
                    PlotRequest::PairGrid { columns } => pair_grid(ui, table, columns),
                    PlotRequest::CorrelationHeatmap { columns } => heatmap(ui, table, columns),
                    PlotRequest::TimeSeries {
                        time_axis,
                        column,
                        tick_rotation_deg,
                    } => time_series(ui, table, time_axis, column, *tick_rotation_deg),
                    PlotRequest::Histogram { column } => histogram(ui, table, column),
                    PlotRequest::ScatterHueSize { x, y, hue, size } => {
                        scatter_hue_size(ui, table, x, y, hue, size)
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Data preview
// ---------------------------------------------------------------------------

fn data_preview(ui: &mut Ui, table: &Table) {
    use egui_extras::{Column as TableColumn, TableBuilder};

    let n_rows = table.n_rows().min(PREVIEW_ROWS);
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(260.0)
        .columns(TableColumn::auto().resizable(true), table.n_cols())
        .header(20.0, |mut header| {
            for col in table.columns() {
                header.col(|ui| {
                    ui.strong(&col.name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, n_rows, |mut row| {
                let r = row.index();
                for col in table.columns() {
                    row.col(|ui| {
                        ui.label(col.values[r].to_string());
                    });
                }
            });
        });

    if table.n_rows() > PREVIEW_ROWS {
        ui.weak(format!(
            "Showing first {PREVIEW_ROWS} of {} rows",
            table.n_rows()
        ));
    }
}

// ---------------------------------------------------------------------------
// Pairwise matrix
// ---------------------------------------------------------------------------

/// Full matrix: every selected column against every other, with each
/// column's own distribution on the diagonal.
fn pair_grid(ui: &mut Ui, table: &Table, columns: &[String]) {
    ui.strong("Pairwise relationships");
    egui::Grid::new("pair_grid")
        .spacing([6.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            let last = columns.len().saturating_sub(1);
            for (i, y_col) in columns.iter().enumerate() {
                for (j, x_col) in columns.iter().enumerate() {
                    let plot = Plot::new(format!("pair_{i}_{j}"))
                        .width(MINI_PLOT_SIZE.x)
                        .height(MINI_PLOT_SIZE.y)
                        .show_axes([i == last, j == 0]);
                    let plot = if i == last {
                        plot.x_axis_label(x_col.clone())
                    } else {
                        plot
                    };
                    let plot = if j == 0 {
                        plot.y_axis_label(y_col.clone())
                    } else {
                        plot
                    };

                    if i == j {
                        let values = stats::numeric_values(table, x_col);
                        plot.show(ui, |plot_ui| {
                            if let Some(h) =
                                stats::histogram(&values, selector::HISTOGRAM_BINS)
                            {
                                plot_ui.bar_chart(histogram_bars(&h, Color32::LIGHT_BLUE));
                            }
                        });
                    } else {
                        let points: PlotPoints =
                            stats::paired_values(table, x_col, y_col).into();
                        plot.show(ui, |plot_ui| {
                            plot_ui.points(
                                Points::new(points).radius(1.5).color(Color32::LIGHT_BLUE),
                            );
                        });
                    }
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

const HEATMAP_CELL: Vec2 = Vec2::new(72.0, 40.0);
const HEATMAP_LABEL_W: f32 = 110.0;
const HEATMAP_LABEL_H: f32 = 22.0;

fn heatmap(ui: &mut Ui, table: &Table, columns: &[String]) {
    ui.strong("Correlation heatmap");
    let matrix = stats::correlation_matrix(table, columns);
    let n = columns.len();

    let size = Vec2::new(
        HEATMAP_LABEL_W + HEATMAP_CELL.x * n as f32,
        HEATMAP_LABEL_H + HEATMAP_CELL.y * n as f32,
    );
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let font = FontId::proportional(11.0);
    let text_color = ui.visuals().text_color();

    // Column labels across the top, row labels down the left.
    for (j, name) in columns.iter().enumerate() {
        let x = rect.left() + HEATMAP_LABEL_W + HEATMAP_CELL.x * (j as f32 + 0.5);
        painter.text(
            Pos2::new(x, rect.top() + HEATMAP_LABEL_H / 2.0),
            Align2::CENTER_CENTER,
            truncate(name, 12),
            font.clone(),
            text_color,
        );
    }
    for (i, name) in columns.iter().enumerate() {
        let y = rect.top() + HEATMAP_LABEL_H + HEATMAP_CELL.y * (i as f32 + 0.5);
        painter.text(
            Pos2::new(rect.left() + HEATMAP_LABEL_W - 6.0, y),
            Align2::RIGHT_CENTER,
            truncate(name, 16),
            font.clone(),
            text_color,
        );
    }

    for (i, row) in matrix.iter().enumerate() {
        for (j, r) in row.iter().enumerate() {
            let min = Pos2::new(
                rect.left() + HEATMAP_LABEL_W + HEATMAP_CELL.x * j as f32,
                rect.top() + HEATMAP_LABEL_H + HEATMAP_CELL.y * i as f32,
            );
            let cell = Rect::from_min_size(min, HEATMAP_CELL).shrink(1.0);

            let (fill, annotation) = match r {
                Some(r) => (color::diverging(*r), format!("{r:.2}")),
                None => (Color32::from_gray(60), "–".to_string()),
            };
            painter.rect_filled(cell, 2, fill);

            let annotation_color = if r.map_or(true, |r| r.abs() > 0.6) {
                Color32::WHITE
            } else {
                Color32::BLACK
            };
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                annotation,
                font.clone(),
                annotation_color,
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

fn time_series(ui: &mut Ui, table: &Table, time_axis: &str, column: &str, rotation_deg: f32) {
    ui.strong(format!("{column} over {time_axis}"));

    let (Some(axis_col), Some(y_col)) = (table.column(time_axis), table.column(column)) else {
        return;
    };
    let temporal = axis_col.ty == ColumnType::Temporal;

    let points: PlotPoints = axis_col
        .values
        .iter()
        .zip(&y_col.values)
        .filter_map(|(x, y)| Some([x.as_axis_f64()?, y.as_f64()?]))
        .collect();

    let response = Plot::new(format!("ts_{column}"))
        .height(240.0)
        .y_axis_label(column.to_string())
        .show_axes([false, true])
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(Color32::LIGHT_BLUE).width(1.5));
        });

    rotated_x_tick_labels(ui, response.transform, temporal, rotation_deg);
    // The rotated labels are painted below the plot rect.
    ui.add_space(42.0);
}

/// Draw x-tick labels by hand so they can be rotated, which the plot
/// widget's built-in axes cannot do.
fn rotated_x_tick_labels(
    ui: &mut Ui,
    transform: egui_plot::PlotTransform,
    temporal: bool,
    rotation_deg: f32,
) {
    const TICKS: usize = 6;

    let bounds = transform.bounds();
    let (min_x, max_x) = (bounds.min()[0], bounds.max()[0]);
    if !min_x.is_finite() || !max_x.is_finite() || max_x <= min_x {
        return;
    }

    let angle = rotation_deg.to_radians();
    let color = ui.visuals().text_color();
    let painter = ui.painter();

    for k in 0..=TICKS {
        let x = min_x + (max_x - min_x) * k as f64 / TICKS as f64;
        let label = if temporal {
            format_axis_timestamp(x)
        } else {
            format!("{x:.1}")
        };
        let anchor = transform.position_from_point(&PlotPoint::new(x, bounds.min()[1]));
        let galley = painter.layout_no_wrap(label, FontId::proportional(10.0), color);
        painter.add(
            TextShape::new(Pos2::new(anchor.x, anchor.y + 4.0), galley, color)
                .with_angle(angle),
        );
    }
}

fn format_axis_timestamp(unix_seconds: f64) -> String {
    chrono::DateTime::from_timestamp(unix_seconds as i64, 0)
        .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| format!("{unix_seconds:.0}"))
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

fn histogram(ui: &mut Ui, table: &Table, column: &str) {
    ui.strong(format!("Histogram of {column}"));

    let values = stats::numeric_values(table, column);
    let Some(h) = stats::histogram(&values, selector::HISTOGRAM_BINS) else {
        ui.weak("No numeric values to bin.");
        return;
    };

    Plot::new(format!("hist_{column}"))
        .height(220.0)
        .x_axis_label(column.to_string())
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(histogram_bars(&h, Color32::LIGHT_BLUE));
        });
}

fn histogram_bars(h: &stats::Histogram, color: Color32) -> BarChart {
    let width = h.bin_width();
    let bars: Vec<Bar> = h
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(h.bin_center(i), count as f64).width(width * 0.95)
        })
        .collect();
    BarChart::new(bars).color(color)
}

// ---------------------------------------------------------------------------
// Scatter with hue / size
// ---------------------------------------------------------------------------

const SCATTER_RADIUS_MIN: f32 = 2.0;
const SCATTER_RADIUS_MAX: f32 = 7.0;

fn scatter_hue_size(ui: &mut Ui, table: &Table, x: &str, y: &str, hue: &str, size: &str) {
    ui.strong(format!("{y} vs {x}  ·  hue {hue}, size {size}"));

    let (Some(x_col), Some(y_col), Some(hue_col), Some(size_col)) = (
        table.column(x),
        table.column(y),
        table.column(hue),
        table.column(size),
    ) else {
        return;
    };

    // Categorical hue gets one colour per unique value; numeric hue uses a
    // sequential ramp over its range.
    let categorical = hue_col.ty == ColumnType::Text || hue_col.ty == ColumnType::Unknown;
    let color_map = categorical.then(|| {
        let unique: BTreeSet<CellValue> = hue_col.values.iter().cloned().collect();
        ColorMap::new(&unique)
    });
    let (hue_min, hue_max) = value_range(&hue_col.values);
    let (size_min, size_max) = value_range(&size_col.values);

    Plot::new("scatter_hue_size")
        .height(320.0)
        .x_axis_label(x.to_string())
        .y_axis_label(y.to_string())
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for row in 0..table.n_rows() {
                let (Some(px), Some(py)) =
                    (x_col.values[row].as_f64(), y_col.values[row].as_f64())
                else {
                    continue;
                };

                let hue_value = &hue_col.values[row];
                let color = match &color_map {
                    Some(map) => map.color_for(hue_value),
                    None => hue_value
                        .as_axis_f64()
                        .map(|v| color::sequential(normalize(v, hue_min, hue_max)))
                        .unwrap_or(Color32::GRAY),
                };

                let radius = size_col.values[row]
                    .as_f64()
                    .map(|v| {
                        let t = normalize(v, size_min, size_max) as f32;
                        SCATTER_RADIUS_MIN + (SCATTER_RADIUS_MAX - SCATTER_RADIUS_MIN) * t
                    })
                    .unwrap_or(SCATTER_RADIUS_MIN);

                let mut points = Points::new(vec![[px, py]]).radius(radius).color(color);
                if color_map.is_some() {
                    // Identical names collapse into one legend entry.
                    points = points.name(hue_value.to_string());
                }
                plot_ui.points(points);
            }
        });
}

fn value_range(values: &[CellValue]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.iter().filter_map(CellValue::as_axis_f64) {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn normalize(v: f64, min: f64, max: f64) -> f64 {
    if !min.is_finite() || !max.is_finite() || max <= min {
        0.5
    } else {
        (v - min) / (max - min)
    }
}
