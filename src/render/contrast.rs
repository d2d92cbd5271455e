//! Background brightness sampling for dimension-line contrast.
//!
//! Runs after the background is on the surface and before any text, so the
//! samples reflect what the lines will actually be drawn over.

use tiny_skia::Pixmap;

use crate::color::{luma, LineColor};

/// Fractional sample coordinates: left/right of center, above/below center.
const SAMPLE_POINTS: [(f32, f32); 4] = [(0.25, 0.5), (0.75, 0.5), (0.5, 0.3), (0.5, 0.7)];

/// Brightness attributed to unreadable or fully transparent pixels.
const NEUTRAL_BRIGHTNESS: f32 = 128.0;

/// Decision threshold, exclusive. Tuned empirically; a compatibility
/// constant, not a derived value.
const BRIGHTNESS_THRESHOLD: f32 = 140.0;

/// Average the sampled brightness and pick the line color: bright
/// backgrounds get dark lines, everything else gets light lines.
pub fn sample_line_color(surface: &Pixmap) -> LineColor {
    let w = surface.width();
    let h = surface.height();
    if w == 0 || h == 0 {
        return LineColor::Light;
    }

    let total: f32 = SAMPLE_POINTS
        .iter()
        .map(|&(fx, fy)| {
            let x = ((w as f32 * fx).floor() as u32).min(w - 1);
            let y = ((h as f32 * fy).floor() as u32).min(h - 1);
            brightness_at(surface, x, y)
        })
        .sum();
    let avg = total / SAMPLE_POINTS.len() as f32;

    if avg > BRIGHTNESS_THRESHOLD {
        LineColor::Dark
    } else {
        LineColor::Light
    }
}

fn brightness_at(surface: &Pixmap, x: u32, y: u32) -> f32 {
    match surface.pixel(x, y) {
        Some(px) if px.alpha() != 0 => {
            let c = px.demultiply();
            luma(c.red(), c.green(), c.blue()) as f32
        }
        // transparent or unreadable: treat as medium gray
        _ => NEUTRAL_BRIGHTNESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    fn gray_surface(v: u8) -> Pixmap {
        let mut pm = Pixmap::new(80, 40).unwrap();
        pm.fill(Color::from_rgba8(v, v, v, 255));
        pm
    }

    #[test]
    fn threshold_is_exclusive_at_140() {
        assert_eq!(sample_line_color(&gray_surface(141)), LineColor::Dark);
        assert_eq!(sample_line_color(&gray_surface(140)), LineColor::Light);
        assert_eq!(sample_line_color(&gray_surface(139)), LineColor::Light);
    }

    #[test]
    fn extremes() {
        assert_eq!(sample_line_color(&gray_surface(255)), LineColor::Dark);
        assert_eq!(sample_line_color(&gray_surface(0)), LineColor::Light);
    }

    #[test]
    fn transparency_counts_as_neutral_gray() {
        let pm = Pixmap::new(80, 40).unwrap(); // fully transparent
        assert_eq!(sample_line_color(&pm), LineColor::Light);
    }

    #[test]
    fn mixed_samples_average() {
        // left half white, right half black: two samples at 255, one at 255
        // and one at 0 depending on position -> avg across the four points
        let mut pm = Pixmap::new(100, 100).unwrap();
        pm.fill(Color::from_rgba8(255, 255, 255, 255));
        let mut dark = tiny_skia::Paint::default();
        dark.set_color_rgba8(0, 0, 0, 255);
        pm.fill_rect(
            tiny_skia::Rect::from_xywh(50.0, 0.0, 50.0, 100.0).unwrap(),
            &dark,
            tiny_skia::Transform::identity(),
            None,
        );
        // samples: (25,50)=255, (75,50)=0, (50,30)=0, (50,70)=0 -> avg 63.75
        assert_eq!(sample_line_color(&pm), LineColor::Light);
    }
}
