use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::union_keys;
use crate::state::AppState;

/// Table of the records on the active page.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let page = state.store.current_page();
    if page.is_empty() {
        ui.label("No records.");
        return;
    }
    let columns = union_keys(&page);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0), columns.len())
        .header(20.0, |mut header| {
            for col in &columns {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|mut body| {
            for record in &page {
                body.row(18.0, |mut row| {
                    for col in &columns {
                        row.col(|ui| {
                            ui.label(record.display(col));
                        });
                    }
                });
            }
        });
}
