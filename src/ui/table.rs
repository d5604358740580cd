use eframe::egui::{self, Context, Ui};
use egui_extras::{Column, TableBuilder};
use lsrs_viewer::data::compare::COMPARISON_HEADERS;

use crate::state::AppState;

/// Recorded comparison points as a table window.
pub fn comparison_window(ctx: &Context, state: &mut AppState) {
    if !state.show_table {
        return;
    }

    let rows = state.session.comparison_rows();
    let mut open = true;
    let mut export = false;

    egui::Window::new("Recorded Points")
        .open(&mut open)
        .resizable(true)
        .default_width(1000.0)
        .default_height(500.0)
        .show(ctx, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label(format!("{} rows", rows.len()));
                if ui.button("Export CSV…").clicked() {
                    export = true;
                }
            });
            ui.separator();

            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .columns(Column::auto().at_least(90.0), COMPARISON_HEADERS.len() - 1)
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    for title in COMPARISON_HEADERS {
                        header.col(|ui: &mut Ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let cells = rows[row.index()].cells();
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });

    if export {
        state.export_table_dialog();
    }
    if !open {
        state.show_table = false;
    }
}
