use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::Theme;
use crate::export::DocumentKind;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu bar, search box and export toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let mut term = state.search_input.clone();
        let search = ui.add(
            egui::TextEdit::singleline(&mut term)
                .hint_text("Search...")
                .desired_width(180.0),
        );
        if search.changed() {
            state.search(&term);
        }

        ui.separator();

        if ui.button("Excel").on_hover_text("Export the filtered records").clicked() {
            save_workbook_dialog(state);
        }
        if ui.button("PDF").on_hover_text("Export charts and table").clicked() {
            save_document_dialog(state, DocumentKind::Full);
        }
        if ui.button("Export Charts").clicked() {
            save_document_dialog(state, DocumentKind::ChartsOnly);
        }

        ui.separator();

        let icon = match state.theme {
            Theme::Light => "🌙",
            Theme::Dark => "☀",
        };
        if ui.button(icon).on_hover_text("Toggle theme").clicked() {
            state.toggle_theme();
        }

        ui.separator();

        if !state.store.full().is_empty() {
            ui.label(format!(
                "{} records loaded, {} visible",
                state.store.full().len(),
                state.store.view_len()
            ));
        }

        if let Some(status) = &state.status {
            let (msg, color) = match status {
                Status::Info(m) => (m, ui.visuals().text_color()),
                Status::Warning(m) => (m, Color32::from_rgb(0xff, 0xc1, 0x07)),
                Status::Error(m) => (m, Color32::RED),
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open progress workbook")
        .add_filter("Excel", &["xlsx", "xls"])
        .pick_file();

    if let Some(path) = file {
        state.import_file(&path);
    }
}

fn save_dialog(title: &str, file_name: &str, filter: &str, extension: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .set_file_name(file_name)
        .add_filter(filter, &[extension])
        .save_file()
}

fn save_workbook_dialog(state: &mut AppState) {
    if state.store.view_len() == 0 {
        state.status = Some(Status::Warning("No data available to export.".to_string()));
        return;
    }
    let name = state.config.export.workbook_file_name.clone();
    if let Some(path) = save_dialog("Export Excel", &name, "Excel", "xlsx") {
        state.save_workbook(&path);
    }
}

fn save_document_dialog(state: &mut AppState, kind: DocumentKind) {
    let (title, name, empty) = match kind {
        DocumentKind::Full => (
            "Export PDF",
            state.config.export.document_file_name.clone(),
            "No data available to export.",
        ),
        DocumentKind::ChartsOnly => (
            "Export Charts",
            state.config.export.charts_file_name.clone(),
            "No charts available to export.",
        ),
    };
    if state.store.view_len() == 0 {
        state.status = Some(Status::Warning(empty.to_string()));
        return;
    }
    if let Some(path) = save_dialog(title, &name, "PDF", "pdf") {
        state.save_document(&path, kind);
    }
}
