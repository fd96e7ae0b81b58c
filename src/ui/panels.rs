use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::ingest::{self, IngestError};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – variable selection and plot toggles
// ---------------------------------------------------------------------------

/// Render the left analysis panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Well Analysis");
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let columns: Vec<String> = match &state.table {
        Some(table) => table.columns().iter().map(|c| c.name.clone()).collect(),
        None => {
            ui.label("No data loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Variables");
            for col in &columns {
                let mut checked = state.is_selected(col);
                if ui.checkbox(&mut checked, col).changed() {
                    state.toggle_column(col);
                }
            }

            ui.separator();
            ui.strong("Plots");

            let elig = state.eligibility();
            if !elig.any {
                ui.label("Select at least two variables.");
                return;
            }

            ui.checkbox(&mut state.toggles.pair_grid, "Pairwise matrix");
            ui.checkbox(&mut state.toggles.heatmap, "Correlation heatmap");

            if elig.time_series {
                ui.checkbox(&mut state.toggles.time_series, "Time series");
                if state.toggles.time_series {
                    combo_box(ui, "time_axis", "Time axis", &columns, &mut state.time_axis);
                }
            }

            ui.checkbox(&mut state.toggles.histograms, "Histograms");

            if elig.scatter {
                ui.checkbox(&mut state.toggles.scatter, "Scatter (hue / size)");
                if state.toggles.scatter {
                    let selected = state.selection.clone();
                    let default_hue = selected.first().cloned();
                    let default_size = selected.get(1).cloned();

                    if state.hue_column.is_none() {
                        state.hue_column = default_hue;
                    }
                    if state.size_column.is_none() {
                        state.size_column = default_size;
                    }
                    combo_box(ui, "hue", "Hue", &selected, &mut state.hue_column);
                    combo_box(ui, "size", "Size", &selected, &mut state.size_column);
                }
            }
        });
}

/// Single-select over a candidate list, mirrored into `slot`.
fn combo_box(
    ui: &mut Ui,
    id: &str,
    label: &str,
    candidates: &[String],
    slot: &mut Option<String>,
) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        let current = slot.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt(id)
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for candidate in candidates {
                    if ui
                        .selectable_label(current == *candidate, candidate)
                        .clicked()
                    {
                        *slot = Some(candidate.clone());
                    }
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let source = state.source_name.as_deref().unwrap_or("data");
            ui.label(format!(
                "{source}: {} rows × {} columns",
                table.n_rows(),
                table.n_cols()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    // The "Supported files" filter also advertises pdf/docx; those are
    // rejected at parse time with a visible message.
    let file = rfd::FileDialog::new()
        .set_title("Upload well-log data")
        .add_filter("Supported files", &["xlsx", "csv", "pdf", "docx"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        match ingest::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows × {} columns from {name}",
                    table.n_rows(),
                    table.n_cols()
                );
                state.set_table(table, name);
            }
            Err(err @ IngestError::UnsupportedFormat(_)) => {
                log::warn!("Rejected {name}: {err}");
                state.clear_table();
                state.status_message = Some(err.to_string());
            }
            Err(err) => {
                log::error!("Failed to load {name}: {err}");
                state.clear_table();
                state.status_message = Some(format!("Error: {err}"));
            }
        }
    }
}
