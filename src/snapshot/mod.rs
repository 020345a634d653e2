//! Raster snapshots of the gauge grid, embedded into PDF exports.

mod glyphs;
pub mod raster;

use image::RgbaImage;

use crate::error::CaptureError;
use crate::gauge::GaugeGrid;

pub use raster::GaugeRasterizer;

/// A captured image: width, height and an RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Packed 8-bit RGB samples with alpha flattened onto white.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.as_raw().len() / 4 * 3);
        for px in self.pixels.pixels() {
            let [r, g, b, a] = px.0;
            let a = a as u16;
            for c in [r, g, b] {
                out.push(((c as u16 * a + 255 * (255 - a)) / 255) as u8);
            }
        }
        out
    }
}

/// Something that can turn a render target into pixels.
///
/// Capture is allowed to fail; exports treat a failure as "no image".
pub trait SnapshotProvider {
    fn capture(&self, target: &GaugeGrid) -> Result<RasterImage, CaptureError>;
}
