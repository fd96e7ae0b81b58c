/// Analysis layer: plot eligibility, planning, and the statistics behind
/// the heatmap and histograms.
///
/// `selector` is deliberately pure — it maps the ordered column selection
/// and the toggle states to a list of [`selector::PlotRequest`]s, which the
/// UI renders in order. Nothing here touches egui.
pub mod selector;
pub mod stats;
