//! Solid-material sign compositing: faked extrusion depth, a tiled texture
//! fill, and a top-lit sheen gradient, all through one text path.

use ab_glyph::FontArc;
use tiny_skia::{
    Color, FilterQuality, GradientStop, LinearGradient, Paint, Pattern, Pixmap, Point, SpreadMode,
    Transform,
};

use super::layout::TextLayout;
use super::text::{build_text_path, fill_path, paint_solid, Baseline};

/// Emboss stroke color (mid-gray, same for every material).
const EMBOSS_RGBA: [u8; 4] = [0x66, 0x66, 0x66, 255];

/// Per-iteration diagonal offset of the emboss pass, in pixels.
const EMBOSS_STEP: f32 = 0.5;

/// Fill used when the texture has not finished loading.
pub const FALLBACK_GRAY: [u8; 4] = [128, 128, 128, 255];

/// Paint `text` as cut material: one emboss pass per millimetre of
/// thickness, then the texture pattern, then the lighting gradient.
pub fn render_material_text(
    surface: &mut Pixmap,
    font: &FontArc,
    text: &str,
    layout: &TextLayout,
    texture: &Pixmap,
    thickness_mm: u32,
) {
    let Some(path) = build_text_path(
        font,
        text,
        layout.font_size_px,
        layout.anchor_x,
        layout.anchor_y,
        Baseline::Middle,
    ) else {
        return;
    };

    // extrusion: repeated offset stamps reaching down-right, deepest last
    let emboss = paint_solid(EMBOSS_RGBA);
    for i in 0..thickness_mm {
        let offset = i as f32 * EMBOSS_STEP;
        fill_path(
            surface,
            &path,
            &emboss,
            Transform::from_translate(offset, offset),
        );
    }

    let mut face = Paint::default();
    face.shader = Pattern::new(
        texture.as_ref(),
        SpreadMode::Repeat,
        FilterQuality::Bilinear,
        1.0,
        Transform::identity(),
    );
    face.anti_alias = true;
    fill_path(surface, &path, &face, Transform::identity());

    // top-lit sheen confined to the glyph band
    let top = layout.anchor_y - layout.font_size_px / 2.0;
    let bottom = layout.anchor_y + layout.font_size_px / 2.0;
    if let Some(sheen) = LinearGradient::new(
        Point::from_xy(layout.anchor_x, top),
        Point::from_xy(layout.anchor_x, bottom),
        vec![
            GradientStop::new(0.0, Color::from_rgba8(255, 255, 255, 77)),
            GradientStop::new(0.5, Color::from_rgba8(255, 255, 255, 0)),
            GradientStop::new(1.0, Color::from_rgba8(0, 0, 0, 51)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    ) {
        let mut lighting = Paint::default();
        lighting.shader = sheen;
        lighting.anti_alias = true;
        fill_path(surface, &path, &lighting, Transform::identity());
    }
}

/// Flat gray stand-in while the texture is still loading. Keeps the
/// preview displayable; the next render picks up the real texture.
pub fn render_fallback_text(surface: &mut Pixmap, font: &FontArc, text: &str, layout: &TextLayout) {
    if let Some(path) = build_text_path(
        font,
        text,
        layout.font_size_px,
        layout.anchor_x,
        layout.anchor_y,
        Baseline::Middle,
    ) {
        fill_path(
            surface,
            &path,
            &paint_solid(FALLBACK_GRAY),
            Transform::identity(),
        );
    }
}
