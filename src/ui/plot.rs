use eframe::egui::{Color32, Ui};
use egui_plot::{HLine, Legend, Line, LineStyle, Plot, PlotPoints, Points};
use lsrs_viewer::units;

use crate::color::{series_color, series_palette, AVERAGE_COLOR};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Measurement plot (central panel)
// ---------------------------------------------------------------------------

/// Render the visible series, the average and the reference lines.
pub fn measurement_plot(ui: &mut Ui, state: &mut AppState) {
    let kind = state.kind;
    let all_series = state.session.series(kind);
    if all_series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load CSV files to view sweeps  (File → Load CSV…)");
        });
        return;
    }

    let palette = series_palette(all_series.len());
    let average = state.session.average(kind);
    let average_color = if ui.visuals().dark_mode {
        Color32::WHITE
    } else {
        AVERAGE_COLOR
    };

    let mut plot = Plot::new("measurement_plot")
        .x_axis_label("FREQUENCY")
        .y_axis_label(kind.to_string())
        .x_axis_formatter(|mark, _range| units::format_frequency(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if state.show_legend {
        plot = plot.legend(Legend::default());
    }

    let response = plot.show(ui, |plot_ui| {
        for (i, series) in all_series.iter().enumerate() {
            if !series.visible {
                continue;
            }
            let color = series_color(&palette, i);
            let points: PlotPoints = series
                .frequencies()
                .iter()
                .zip(series.values())
                .map(|(&f, &v)| [f, v])
                .collect();
            plot_ui.line(Line::new(points).name(&series.name).color(color).width(1.5));
        }

        if let Some(avg) = average {
            let coords: Vec<[f64; 2]> = avg
                .frequencies
                .iter()
                .zip(&avg.values)
                .map(|(&f, &v)| [f, v])
                .collect();
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name(kind.average_name())
                    .color(average_color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .name(kind.average_name())
                    .color(average_color)
                    .radius(3.0),
            );
        }

        if state.lines_visible {
            let line_color = state.line_color.color32();
            for &y in &state.reference_lines {
                plot_ui.hline(
                    HLine::new(y)
                        .color(line_color)
                        .style(LineStyle::dashed_loose()),
                );
            }
        }

        plot_ui.pointer_coordinate().map(|p| p.x)
    });

    let hovered_frequency = response.inner;
    let plot_response = response.response;
    state.plot_rect = Some(plot_response.rect);

    if plot_response.secondary_clicked() {
        state.context_frequency = hovered_frequency;
    }

    let plot_response = match hovered_frequency.and_then(|f| state.tracer_readout(f)) {
        Some((name, frequency, value)) => plot_response.on_hover_ui_at_pointer(|ui| {
            ui.strong(name);
            ui.label(format!("FREQUENCY: {frequency}, VALUE: {value}"));
        }),
        None => plot_response,
    };

    plot_response.context_menu(|ui| {
        let Some(frequency) = state.context_frequency else {
            ui.label("Move the pointer over the plot first");
            return;
        };
        ui.label(units::format_frequency(frequency));
        if ui.button("Compare").clicked() {
            state.compare_at(frequency);
            ui.close_menu();
        }
        if !state.selected.is_empty() {
            if ui.button("Hide selected").clicked() {
                state.hide_selected();
                ui.close_menu();
            }
            if ui.button("Show only selected").clicked() {
                state.show_only_selected();
                ui.close_menu();
            }
        }
    });
}
