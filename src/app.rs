use eframe::egui;

use crate::color::{to_color32, Theme};
use crate::state::AppState;
use crate::ui::{gauges, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    applied_theme: Option<Theme>,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            applied_theme: None,
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let theme = self.state.theme;
        if self.applied_theme == Some(theme) {
            return;
        }
        let mut visuals = match theme {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        };
        visuals.panel_fill = to_color32(theme.background());
        visuals.override_text_color = Some(to_color32(theme.text()));
        ctx.set_visuals(visuals);
        self.applied_theme = Some(theme);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);

        // ---- Top panel: menu, search, exports ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: pagination ----
        egui::TopBottomPanel::bottom("pagination").show(ctx, |ui| {
            gauges::pagination(ui, &mut self.state);
        });

        // ---- Central panel: gauges and records ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    gauges::gauge_grid(ui, &self.state);
                    if !self.state.store.current_page().is_empty() {
                        ui.separator();
                        egui::CollapsingHeader::new("Records")
                            .default_open(false)
                            .show(ui, |ui| table::records_table(ui, &self.state));
                    }
                });
        });
    }
}
