//! Side panels: annotation visibility tree and profiler timings.

use egui::collapsing_header::CollapsingState;
use egui::Ui;
use nv_core::profiler::format_ms;
use nv_core::registry::VisibilityEntry;
use nv_core::{AnnotationRegistry, Profiler};

/// Show/hide controls for every annotation namespace.
///
/// `a.b.c` is listed under node `a.b` as `c`; namespaces without a dot are
/// top-level checkboxes.
pub fn visibility_panel(ui: &mut Ui, registry: &mut AnnotationRegistry) {
    ui.horizontal(|ui| {
        ui.label("All");
        show_hide_buttons(ui, |enabled| registry.set_all_enabled(enabled));
    });
    ui.separator();

    for (node, entries) in registry.visibility_tree() {
        let Some(node) = node else {
            for entry in &entries {
                namespace_checkbox(ui, registry, entry);
            }
            continue;
        };

        let id = ui.make_persistent_id(("visibility_node", &node));
        CollapsingState::load_with_default_open(ui.ctx(), id, true)
            .show_header(ui, |ui| {
                ui.label(&node);
                show_hide_buttons(ui, |enabled| {
                    registry.set_node_enabled(Some(&node), enabled)
                });
            })
            .body(|ui| {
                for entry in &entries {
                    namespace_checkbox(ui, registry, entry);
                }
            });
    }
}

fn show_hide_buttons(ui: &mut Ui, mut apply: impl FnMut(bool)) {
    if ui.small_button("show").clicked() {
        apply(true);
    }
    if ui.small_button("hide").clicked() {
        apply(false);
    }
}

fn namespace_checkbox(ui: &mut Ui, registry: &mut AnnotationRegistry, entry: &VisibilityEntry) {
    let mut enabled = entry.enabled;
    if ui
        .checkbox(&mut enabled, &entry.label)
        .on_hover_text(&entry.namespace)
        .changed()
    {
        tracing::debug!(namespace = %entry.namespace, enabled, "Toggled annotation visibility");
        registry.set_enabled(&entry.namespace, enabled);
    }
}

/// Timing entries in name order.
pub fn profiler_panel(ui: &mut Ui, profiler: &Profiler) {
    if profiler.is_empty() {
        ui.weak("No timings yet");
        return;
    }
    egui::Grid::new("profiler_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for (name, elapsed) in profiler.iter() {
                ui.monospace(name);
                ui.monospace(format_ms(elapsed));
                ui.end_row();
            }
        });
}
