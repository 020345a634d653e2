use std::f32::consts::TAU;

use image::{Rgba, RgbaImage};
use palette::Srgb;

use super::glyphs::{chars_fitting, glyph, text_units, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::{RasterImage, SnapshotProvider};
use crate::color::{band_color, to_rgba, Theme};
use crate::config::SnapshotConfig;
use crate::error::CaptureError;
use crate::gauge::{Gauge, GaugeGrid};

/// Outer ring radius as a fraction of the cell size.
pub(crate) const RING_OUTER: f32 = 0.42;
/// Ring thickness as a fraction of the cell size.
pub(crate) const RING_WIDTH: f32 = 0.08;

// ---------------------------------------------------------------------------
// Offscreen gauge renderer
// ---------------------------------------------------------------------------

/// Software renderer for the gauge grid: one square ring cell per gauge with
/// its caption in a band underneath.
#[derive(Debug, Clone)]
pub struct GaugeRasterizer {
    cell_size: u32,
    scale: u32,
    max_dimension: u32,
}

impl GaugeRasterizer {
    pub fn new(config: &SnapshotConfig) -> Self {
        Self {
            cell_size: config.cell_size.max(1),
            scale: config.scale.max(1),
            max_dimension: config.max_dimension,
        }
    }

    /// Cell edge in device pixels.
    pub fn cell_pixels(&self) -> u32 {
        self.cell_size.saturating_mul(self.scale)
    }

    /// Height of one grid row: the ring cell plus its caption band.
    pub fn row_pixels(&self) -> u32 {
        let cell = self.cell_pixels();
        cell.saturating_add(caption_band(cell))
    }
}

impl Default for GaugeRasterizer {
    fn default() -> Self {
        Self::new(&SnapshotConfig::default())
    }
}

impl SnapshotProvider for GaugeRasterizer {
    fn capture(&self, grid: &GaugeGrid) -> Result<RasterImage, CaptureError> {
        let (cols, rows) = grid.dimensions();
        if cols == 0 {
            return Err(CaptureError::EmptyTarget);
        }

        let cell = self.cell_pixels();
        let width = u32::try_from(cols).unwrap_or(u32::MAX).saturating_mul(cell);
        let height = u32::try_from(rows)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.row_pixels());
        if width > self.max_dimension || height > self.max_dimension {
            return Err(CaptureError::TooLarge {
                width,
                height,
                max: self.max_dimension,
            });
        }

        let mut img = RgbaImage::from_pixel(width, height, to_rgba(grid.theme.background()));
        for (i, gauge) in grid.gauges.iter().enumerate() {
            let x0 = (i % cols) as u32 * cell;
            let y0 = (i / cols) as u32 * self.row_pixels();
            draw_gauge(&mut img, x0, y0, cell, gauge, grid.theme);
        }

        log::debug!("rasterized {} gauges into {width}x{height}", grid.gauges.len());
        Ok(RasterImage::new(img))
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

fn draw_gauge(img: &mut RgbaImage, x0: u32, y0: u32, cell: u32, gauge: &Gauge, theme: Theme) {
    let cx = x0 as f32 + cell as f32 / 2.0;
    let cy = y0 as f32 + cell as f32 / 2.0;
    let outer = cell as f32 * RING_OUTER;
    let inner = outer - cell as f32 * RING_WIDTH;

    let track = theme.track();
    let path = gauge.fraction.map(band_color).unwrap_or(track);
    let filled = gauge.fraction.unwrap_or(0.0).clamp(0.0, 1.0) as f32;

    let x_min = (cx - outer - 1.0).max(0.0) as u32;
    let y_min = (cy - outer - 1.0).max(0.0) as u32;
    let x_max = ((cx + outer + 1.0) as u32).min(img.width());
    let y_max = ((cy + outer + 1.0) as u32).min(img.height());

    for py in y_min..y_max {
        for px in x_min..x_max {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = (outer - d + 0.5).clamp(0.0, 1.0) * (d - inner + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }

            // Clockwise from twelve o'clock, in turns.
            let mut angle = dx.atan2(-dy);
            if angle < 0.0 {
                angle += TAU;
            }
            let color = if filled > 0.0 && angle / TAU <= filled {
                path
            } else {
                track
            };
            blend(img.get_pixel_mut(px, py), color, coverage);
        }
    }

    let text = gauge.percent_text();
    let unit = (cell / 48).max(1);
    let text_w = text_units(text.chars().count()) * unit;
    let text_h = GLYPH_HEIGHT * unit;
    let tx = (cx - text_w as f32 / 2.0).max(0.0) as u32;
    let ty = (cy - text_h as f32 / 2.0).max(0.0) as u32;
    draw_text(img, &text, tx, ty, unit, theme.text());

    let unit = (cell / 120).max(1);
    let margin = cell / 20;
    let max_chars = chars_fitting(cell.saturating_sub(2 * margin) / unit);
    let caption = fit_caption(&gauge.caption(), max_chars);
    let caption_w = text_units(caption.chars().count()) * unit;
    let tx = x0 + cell.saturating_sub(caption_w) / 2;
    let ty = y0 + cell + caption_band(cell).saturating_sub(GLYPH_HEIGHT * unit) / 2;
    draw_text(img, &caption, tx, ty, unit, theme.text());
}

fn caption_band(cell: u32) -> u32 {
    cell / 5
}

/// `text` cut to `max_chars`, ending in `...` when shortened.
fn fit_caption(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars()
        .take(max_chars.saturating_sub(3))
        .chain("...".chars())
        .take(max_chars)
        .collect()
}

fn draw_text(img: &mut RgbaImage, text: &str, x: u32, y: u32, unit: u32, color: Srgb<u8>) {
    let rgba = to_rgba(color);
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c).or_else(|| glyph('?')) else {
            continue;
        };
        let gx = x + i as u32 * GLYPH_ADVANCE * unit;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let px0 = gx + col * unit;
                let py0 = y + row as u32 * unit;
                for py in py0..(py0 + unit).min(img.height()) {
                    for px in px0..(px0 + unit).min(img.width()) {
                        img.put_pixel(px, py, rgba);
                    }
                }
            }
        }
    }
}

fn blend(dst: &mut Rgba<u8>, color: Srgb<u8>, alpha: f32) {
    let src = [color.red, color.green, color.blue];
    for (d, s) in dst.0.iter_mut().zip(src) {
        *d = (*d as f32 * (1.0 - alpha) + s as f32 * alpha).round() as u8;
    }
}
