use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use lsrs_viewer::data::model::Kind;
use lsrs_viewer::data::ranking::EXCLUDED_RATIO;
use lsrs_viewer::units;

use crate::color::{series_color, series_palette, LineColor};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – series list and analysis controls
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            series_section(ui, state);
            ui.separator();
            average_section(ui, state);
            ui.separator();
            comparison_section(ui, state);
            ui.separator();
            display_section(ui, state);
        });
}

fn series_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Series");

    let kind = state.kind;
    let series = state.session.series(kind);
    if series.is_empty() {
        ui.label("No CSV data loaded.");
        return;
    }

    // Snapshot so the loop can mutate state.
    let rows: Vec<(String, bool, usize)> = series
        .iter()
        .map(|s| (s.name.clone(), s.visible, s.len()))
        .collect();
    let palette = series_palette(rows.len());
    let ranking = state.session.rank_series(kind).ok();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("Default").on_hover_text("Show every series").clicked() {
            state.show_all();
        }
        if ui.small_button("Hide selected").clicked() {
            state.hide_selected();
        }
        if ui.small_button("Show only selected").clicked() {
            state.show_only_selected();
        }
    });

    for (i, (name, visible, len)) in rows.into_iter().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            let mut checked = visible;
            if ui.checkbox(&mut checked, "").changed() {
                state.set_visibility(i, checked);
            }

            let text = RichText::new(&name).color(series_color(&palette, i));
            let selected = state.selected.contains(&i);
            if ui
                .selectable_label(selected, text)
                .on_hover_text(format!("{len} samples"))
                .clicked()
            {
                state.toggle_selected(i);
            }

            if let Some(entry) = ranking.as_ref().and_then(|r| r.entries.get(i)) {
                let label = if entry.ratio == EXCLUDED_RATIO {
                    "excluded".to_string()
                } else {
                    units::format_ratio_percent(entry.ratio)
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(label);
                });
            }
        });
    }
}

fn average_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Average");
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Calculate average").clicked() {
            state.calculate_average();
        }
        if let Some(avg) = state.session.average(state.kind) {
            ui.label(format!("{} series", avg.contributors.len()));
        }
    });

    ui.add_space(4.0);
    ui.strong("Highlight");
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::DragValue::new(&mut state.threshold_percent)
                .speed(0.5)
                .range(0.0..=100.0)
                .suffix(" %"),
        );
        if ui
            .button("Highlight")
            .on_hover_text("Hide series whose distance ratio exceeds the threshold")
            .clicked()
        {
            state.highlight();
        }
    });
}

fn comparison_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Comparison");
    ui.label(format!("{} recorded points", state.session.recorded_points().len()));
    ui.label(RichText::new("Right-click the plot to compare at a frequency.").small().weak());
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Table").clicked() {
            state.open_table();
        }
        if ui.button("Clear table").clicked() {
            state.session.clear_recorded_points();
        }
    });
}

fn display_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Display");
    ui.checkbox(&mut state.show_legend, "Legend");
    ui.checkbox(&mut state.tracer_enabled, "Tracer")
        .on_hover_text("Show the nearest sample of the first selected series");

    ui.add_space(4.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.checkbox(&mut state.lines_visible, "Lines");
        egui::ComboBox::from_id_salt("line_color")
            .selected_text(state.line_color.label())
            .show_ui(ui, |ui: &mut Ui| {
                for color in LineColor::ALL {
                    ui.selectable_value(&mut state.line_color, color, color.label());
                }
            });
    });
    egui::Grid::new("line_inputs").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("Min value");
        ui.text_edit_singleline(&mut state.line_min_input);
        ui.end_row();
        ui.label("Max value");
        ui.text_edit_singleline(&mut state.line_max_input);
        ui.end_row();
    });
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Add lines").clicked() {
            state.add_reference_lines();
        }
        if ui.button("Clear lines").clicked() {
            state.reference_lines.clear();
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load CSV…").clicked() {
                state.open_files_dialog();
                ui.close_menu();
            }
            if ui.button("Export average as CSV…").clicked() {
                state.export_average_dialog();
                ui.close_menu();
            }
            if ui.button("Export comparison table…").clicked() {
                state.export_table_dialog();
                ui.close_menu();
            }
            if ui.button("Save plot as PNG…").clicked() {
                state.save_plot_dialog();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Clear").clicked() {
                state.clear();
                ui.close_menu();
            }
        });

        if ui.button("Settings").clicked() {
            state.open_settings();
        }

        ui.separator();

        for kind in Kind::ALL {
            if ui.radio(state.kind == kind, kind.to_string()).clicked() {
                state.set_kind(kind);
            }
        }

        ui.separator();

        let store = state.session.store();
        if !store.is_empty() {
            ui.label(format!(
                "{} files loaded, {} visible",
                store.len(state.kind),
                store.visible(state.kind).count()
            ));
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}
