//! Adaptive text fitting.

use ab_glyph::FontArc;

use super::text::measure_width;

/// Fitted geometry for one render. Computed once per call, never cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextLayout {
    pub font_size_px: f32,
    pub text_width_px: f32,
    pub text_height_px: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
}

/// Minimum font size; fitting stops here and accepts overflow.
pub const MIN_FONT_SIZE: f32 = 20.0;

/// Text may occupy at most this fraction of the canvas width.
pub const MAX_WIDTH_FRACTION: f32 = 0.9;

/// Responsive starting size for a given canvas width.
pub fn base_font_size(canvas_width: f32) -> f32 {
    (canvas_width / 400.0 * 70.0).clamp(40.0, 90.0)
}

/// Shrink from the responsive base size in 2px steps until the measured
/// width fits `MAX_WIDTH_FRACTION` of the canvas or the floor is reached.
/// Bounded: at most ~35 iterations from the largest base size.
pub fn fit_text(font: &FontArc, text: &str, canvas_width: f32, canvas_height: f32) -> TextLayout {
    let max_text_width = canvas_width * MAX_WIDTH_FRACTION;
    let mut size = base_font_size(canvas_width);
    let mut width = measure_width(font, text, size);

    while width > max_text_width && size > MIN_FONT_SIZE {
        size = (size - 2.0).max(MIN_FONT_SIZE);
        width = measure_width(font, text, size);
    }

    TextLayout {
        font_size_px: size,
        text_width_px: width,
        text_height_px: size,
        anchor_x: canvas_width / 2.0,
        anchor_y: canvas_height * 0.4,
    }
}
