use crate::analysis::selector::{self, Eligibility, PlotToggles};
use crate::data::table::Table;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Every frame re-reads it and
/// re-plans the plots; nothing derived from it is cached across frames.
pub struct AppState {
    /// Loaded, cleaned table (None until the user opens a file).
    pub table: Option<Table>,

    /// File name of the loaded table, for the top bar.
    pub source_name: Option<String>,

    /// Columns chosen for analysis, in click order. The order is semantic:
    /// the first and second entries become the scatter x/y axes.
    pub selection: Vec<String>,

    /// Per-plot "show X" checkboxes.
    pub toggles: PlotToggles,

    /// Column used as the time-series x axis. Any table column qualifies,
    /// not just selected ones.
    pub time_axis: Option<String>,

    /// Scatter hue column, constrained to the selection. None → default
    /// (first selected).
    pub hue_column: Option<String>,

    /// Scatter size column, constrained to the selection. None → default
    /// (second selected).
    pub size_column: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source_name: None,
            selection: Vec::new(),
            toggles: PlotToggles::default(),
            time_axis: None,
            hue_column: None,
            size_column: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table, resetting every selection and toggle.
    pub fn set_table(&mut self, table: Table, source_name: String) {
        self.selection.clear();
        self.toggles = PlotToggles::default();
        self.time_axis = table.columns().first().map(|c| c.name.clone());
        self.hue_column = None;
        self.size_column = None;
        self.source_name = Some(source_name);
        self.table = Some(table);
        self.status_message = None;
    }

    /// Forget the loaded table. Used when a new upload fails to parse, so
    /// the page reflects the latest upload rather than a stale table.
    pub fn clear_table(&mut self) {
        self.table = None;
        self.source_name = None;
        self.selection.clear();
        self.toggles = PlotToggles::default();
        self.time_axis = None;
        self.hue_column = None;
        self.size_column = None;
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.iter().any(|c| c == name)
    }

    /// Toggle a column in the ordered selection: on appends to the end
    /// (preserving click order), off removes it and drops any auxiliary
    /// pick that referenced it.
    pub fn toggle_column(&mut self, name: &str) {
        if let Some(pos) = self.selection.iter().position(|c| c == name) {
            self.selection.remove(pos);
        } else {
            self.selection.push(name.to_string());
        }
        if !self.pick_in_selection(&self.hue_column) {
            self.hue_column = None;
        }
        if !self.pick_in_selection(&self.size_column) {
            self.size_column = None;
        }
    }

    fn pick_in_selection(&self, pick: &Option<String>) -> bool {
        match pick {
            Some(name) => self.is_selected(name),
            None => true,
        }
    }

    /// Eligibility of the plot families for the current table + selection.
    pub fn eligibility(&self) -> Eligibility {
        match &self.table {
            Some(table) => selector::eligibility(
                &self.selection,
                table.has_column(selector::TIME_COLUMN),
            ),
            None => Eligibility::default(),
        }
    }
}
