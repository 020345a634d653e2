use std::f32::consts::TAU;

use eframe::egui::{self, Align2, FontId, Pos2, Response, Sense, Shape, Stroke, Ui};

use crate::color::{band_color, to_color32, Theme};
use crate::gauge::Gauge;
use crate::snapshot::raster::{RING_OUTER, RING_WIDTH};
use crate::state::AppState;

const GAUGE_SIZE: f32 = 120.0;
const CAPTION_HEIGHT: f32 = 24.0;

// ---------------------------------------------------------------------------
// Gauge grid (central panel)
// ---------------------------------------------------------------------------

/// Render the gauges of the active page.
pub fn gauge_grid(ui: &mut Ui, state: &AppState) {
    if state.store.full().is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a workbook to view progress  (File → Open…)");
        });
        return;
    }

    let grid = state.current_grid();
    if grid.is_empty() {
        ui.label("No records match the search.");
        return;
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for gauge in &grid.gauges {
            gauge_widget(ui, gauge, grid.theme);
        }
    });
}

fn gauge_widget(ui: &mut Ui, gauge: &Gauge, theme: Theme) -> Response {
    let size = egui::vec2(GAUGE_SIZE, GAUGE_SIZE + CAPTION_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let center = egui::pos2(rect.center().x, rect.top() + GAUGE_SIZE / 2.0);
        let radius = GAUGE_SIZE * (RING_OUTER - RING_WIDTH / 2.0);
        let width = GAUGE_SIZE * RING_WIDTH;
        let text_color = to_color32(theme.text());

        let track = Stroke::new(width, to_color32(theme.track()));
        painter.circle_stroke(center, radius, track);
        if let Some(fraction) = gauge.fraction {
            let filled = fraction.clamp(0.0, 1.0) as f32;
            if filled > 0.0 {
                let color = to_color32(band_color(fraction));
                let arc = arc_points(center, radius, filled);
                painter.add(Shape::line(arc, Stroke::new(width, color)));
            }
        }

        painter.text(
            center,
            Align2::CENTER_CENTER,
            gauge.percent_text(),
            FontId::proportional(20.0),
            text_color,
        );
        painter.text(
            egui::pos2(rect.center().x, rect.bottom() - CAPTION_HEIGHT / 2.0),
            Align2::CENTER_CENTER,
            gauge.caption(),
            FontId::proportional(14.0),
            text_color,
        );
    }

    response.on_hover_text(gauge.tooltip())
}

/// Points along a clockwise arc starting at twelve o'clock.
fn arc_points(center: Pos2, radius: f32, fraction: f32) -> Vec<Pos2> {
    let steps = ((64.0 * fraction).ceil() as usize).max(2);
    (0..=steps)
        .map(|i| {
            let a = TAU * fraction * i as f32 / steps as f32;
            center + radius * egui::vec2(a.sin(), -a.cos())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pagination (bottom panel)
// ---------------------------------------------------------------------------

/// Page buttons; hidden when everything fits on one page.
pub fn pagination(ui: &mut Ui, state: &mut AppState) {
    let total = state.store.total_pages();
    if total <= 1 {
        return;
    }
    let current = state.store.page_index();
    let first = (current - 1) * state.store.page_size() + 1;
    let last = first + state.store.current_page().len() - 1;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label(format!("Showing {first}-{last} of {}", state.store.view_len()));
        ui.separator();
        for number in 1..=total {
            if ui
                .selectable_label(current == number, number.to_string())
                .clicked()
            {
                state.set_page(number);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_starts_at_top_and_runs_clockwise() {
        let c = egui::pos2(0.0, 0.0);
        let pts = arc_points(c, 10.0, 0.25);
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert!((first.x - 0.0).abs() < 1e-4 && (first.y + 10.0).abs() < 1e-4);
        assert!((last.x - 10.0).abs() < 1e-4 && last.y.abs() < 1e-4);
    }
}
