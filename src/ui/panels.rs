use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::PayloadRange;
use crate::state::{AppState, ControlEvent, PAYLOAD_SLIDER_ID, SITE_DROPDOWN_ID};

// ---------------------------------------------------------------------------
// Left side panel – controls
// ---------------------------------------------------------------------------

/// Render the site dropdown and payload range slider.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    // ---- Site dropdown ----
    ui.strong("Launch Site");
    let mut selected = state.site.clone();
    egui::ComboBox::from_id_salt(SITE_DROPDOWN_ID)
        .selected_text(selected.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in state.site_options() {
                let label = option.label().to_string();
                ui.selectable_value(&mut selected, option, label);
            }
        });
    if selected != state.site {
        state.apply(ControlEvent::SiteSelected(selected));
    }

    ui.add_space(8.0);
    ui.separator();

    // ---- Payload range ----
    ui.strong("Payload range (Kg):");
    let (lo, hi) = state.slider_bounds;
    let mut from = state.payload.min();
    let mut to = state.payload.max();
    let mut changed = false;

    ui.push_id(PAYLOAD_SLIDER_ID, |ui: &mut Ui| {
        for (value, text) in [(&mut from, "min"), (&mut to, "max")] {
            let mut slider = egui::Slider::new(value, lo..=hi).text(text);
            if state.slider_step > 0.0 {
                slider = slider.step_by(state.slider_step);
            }
            changed |= ui.add(slider).changed();
        }
    });

    if changed {
        // Crossed handles are normalised, not rejected.
        state.apply(ControlEvent::PayloadRangeChanged(PayloadRange::new(from, to)));
    }

    ui.label(format!("Showing {}", state.payload));
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
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches across {} sites, {} in scatter",
            state.dataset.len(),
            state.dataset.launch_sites.len(),
            state.scatter.point_count()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(
            RichText::new("SpaceX Launch Records Dashboard")
                .size(28.0)
                .color(Color32::from_rgb(0x50, 0x3D, 0x36)),
        );
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(report) => {
                let note = report.skipped.first().map(|first| {
                    format!(
                        "{} malformed rows skipped (first: row {}, {})",
                        report.skipped.len(),
                        first.row,
                        first.reason
                    )
                });
                state.set_dataset(report.dataset);
                state.status_message = note;
            }
            Err(e) => {
                // The previous dataset stays on screen.
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart specifications")
        .add_filter("JSON", &["json"])
        .set_file_name("charts.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::export::write_chart_specs(&path, &state.chart_specs()) {
            log::error!("Failed to export charts: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
