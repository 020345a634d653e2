use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Lighten, Srgb};

// ---------------------------------------------------------------------------
// Gauge colour bands
// ---------------------------------------------------------------------------

pub const GAUGE_GREEN: Srgb<u8> = Srgb::new(0x28, 0xa7, 0x45);
pub const GAUGE_AMBER: Srgb<u8> = Srgb::new(0xff, 0xc1, 0x07);
pub const GAUGE_RED: Srgb<u8> = Srgb::new(0xdc, 0x35, 0x45);

/// Path colour for a completion fraction: ≥ 0.8 green, ≤ 0.5 red, amber in
/// between.
pub fn band_color(fraction: f64) -> Srgb<u8> {
    if fraction >= 0.8 {
        GAUGE_GREEN
    } else if fraction <= 0.5 {
        GAUGE_RED
    } else {
        GAUGE_AMBER
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn background(self) -> Srgb<u8> {
        match self {
            Theme::Light => Srgb::new(0xff, 0xff, 0xff),
            Theme::Dark => Srgb::new(0x24, 0x24, 0x24),
        }
    }

    pub fn text(self) -> Srgb<u8> {
        match self {
            Theme::Light => Srgb::new(0x21, 0x25, 0x29),
            Theme::Dark => Srgb::new(0xff, 0xff, 0xff),
        }
    }

    /// Unfilled part of a gauge ring, derived from the background so it reads
    /// on both themes.
    pub fn track(self) -> Srgb<u8> {
        let bg: Hsl = self.background().into_format::<f32>().into_color();
        let shifted = match self {
            Theme::Light => bg.darken(0.16),
            Theme::Dark => bg.lighten(0.12),
        };
        let rgb: Srgb = shifted.into_color();
        rgb.into_format()
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

pub fn to_rgba(c: Srgb<u8>) -> image::Rgba<u8> {
    image::Rgba([c.red, c.green, c.blue, 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands() {
        assert_eq!(band_color(0.8), GAUGE_GREEN);
        assert_eq!(band_color(1.2), GAUGE_GREEN);
        assert_eq!(band_color(0.5), GAUGE_RED);
        assert_eq!(band_color(0.0), GAUGE_RED);
        assert_eq!(band_color(0.51), GAUGE_AMBER);
    }

    #[test]
    fn light_track_is_light_grey() {
        let t = Theme::Light.track();
        assert_eq!(t.red, t.green);
        assert_eq!(t.green, t.blue);
        assert!((200..=225).contains(&t.red), "{t:?}");
    }

    #[test]
    fn dark_track_is_lighter_than_background() {
        let bg = Theme::Dark.background();
        let t = Theme::Dark.track();
        assert!(t.red > bg.red);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
