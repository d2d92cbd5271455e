//! Measurement overlays: straight connector, perpendicular end caps, and a
//! centered label in the render's contrast-picked line color.
//!
//! Neon signs get two lines (declared width below, declared height left).
//! Material signs add a third short line for cut thickness on the right.
//! Both sign types label width/height from the declared product size; the
//! legacy pixel-ratio estimate on the material path was a divergence, not a
//! feature.

use ab_glyph::FontArc;
use tiny_skia::{PathBuilder, Pixmap, Stroke, Transform};

use crate::color::LineColor;
use crate::config::SizeCm;

use super::layout::TextLayout;
use super::text::{build_text_path, fill_path, paint_solid, Baseline};

/// Perpendicular end-cap half-length, px.
const CAP: f32 = 8.0;

/// Gap between text block and its dimension lines on the neon path, px.
const NEON_GAP: f32 = 30.0;

/// Base gap on the material path; the material thickness is added on top.
const MATERIAL_GAP: f32 = 20.0;

/// Label size is this fraction of the reference font size...
const LABEL_SCALE: f32 = 0.2;
/// ...clamped to this range.
const LABEL_MIN: f32 = 12.0;
const LABEL_MAX: f32 = 18.0;

pub fn label_font_size(ref_font_size: f32) -> f32 {
    (ref_font_size * LABEL_SCALE).clamp(LABEL_MIN, LABEL_MAX)
}

/// Horizontal dimension line from (x1, y1) to (x2, y2) with the label
/// centered 10px above it.
#[allow(clippy::too_many_arguments)]
pub fn draw_dimension_line(
    surface: &mut Pixmap,
    font: &FontArc,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    label: &str,
    ref_font_size: f32,
    line_color: LineColor,
) {
    let paint = paint_solid(line_color.rgba());
    let mut pb = PathBuilder::new();
    pb.move_to(x1, y1);
    pb.line_to(x2, y2);
    pb.move_to(x1, y1 - CAP);
    pb.line_to(x1, y1 + CAP);
    pb.move_to(x2, y2 - CAP);
    pb.line_to(x2, y2 + CAP);
    stroke(surface, pb, &paint);

    if let Some(text) = build_text_path(
        font,
        label,
        label_font_size(ref_font_size),
        (x1 + x2) / 2.0,
        y1 - 10.0,
        Baseline::Bottom,
    ) {
        fill_path(surface, &text, &paint, Transform::identity());
    }
}

/// Vertical counterpart; the label is rotated -90° and sits 15px left of
/// the line.
#[allow(clippy::too_many_arguments)]
pub fn draw_dimension_line_vertical(
    surface: &mut Pixmap,
    font: &FontArc,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    label: &str,
    ref_font_size: f32,
    line_color: LineColor,
) {
    let paint = paint_solid(line_color.rgba());
    let mut pb = PathBuilder::new();
    pb.move_to(x1, y1);
    pb.line_to(x2, y2);
    pb.move_to(x1 - CAP, y1);
    pb.line_to(x1 + CAP, y1);
    pb.move_to(x2 - CAP, y2);
    pb.line_to(x2 + CAP, y2);
    stroke(surface, pb, &paint);

    let (cx, cy) = (x1 - 15.0, (y1 + y2) / 2.0);
    if let Some(text) = build_text_path(
        font,
        label,
        label_font_size(ref_font_size),
        cx,
        cy,
        Baseline::Middle,
    ) {
        fill_path(
            surface,
            &text,
            &paint,
            Transform::from_rotate_at(-90.0, cx, cy),
        );
    }
}

/// Neon overlay: declared width bracketed below the text, declared height
/// to its left.
pub fn draw_neon_dimensions(
    surface: &mut Pixmap,
    font: &FontArc,
    layout: &TextLayout,
    size: SizeCm,
    ref_font_size: f32,
    line_color: LineColor,
) {
    let half_w = layout.text_width_px / 2.0;
    let half_h = layout.text_height_px / 2.0;
    let below = layout.anchor_y + half_h + NEON_GAP;
    let left = layout.anchor_x - half_w - NEON_GAP;

    draw_dimension_line(
        surface,
        font,
        layout.anchor_x - half_w,
        below,
        layout.anchor_x + half_w,
        below,
        &format!("{}cm", size.width_cm),
        ref_font_size,
        line_color,
    );
    draw_dimension_line_vertical(
        surface,
        font,
        left,
        layout.anchor_y - half_h,
        left,
        layout.anchor_y + half_h,
        &format!("{}cm", size.height_cm),
        ref_font_size,
        line_color,
    );
}

/// Material overlay: width below and height left (declared size, offset by
/// the extrusion depth), plus the thickness callout on the right — a short
/// vertical segment as tall as the material is thick.
pub fn draw_material_dimensions(
    surface: &mut Pixmap,
    font: &FontArc,
    layout: &TextLayout,
    size: SizeCm,
    thickness_mm: u32,
    line_color: LineColor,
) {
    let half_w = layout.text_width_px / 2.0;
    let half_h = layout.text_height_px / 2.0;
    let thickness = thickness_mm as f32;
    let ref_size = layout.font_size_px;

    let below = layout.anchor_y + half_h + MATERIAL_GAP + thickness;
    draw_dimension_line(
        surface,
        font,
        layout.anchor_x - half_w,
        below,
        layout.anchor_x + half_w,
        below,
        &format!("{}cm", size.width_cm),
        ref_size,
        line_color,
    );

    let left = layout.anchor_x - half_w - MATERIAL_GAP - thickness;
    draw_dimension_line_vertical(
        surface,
        font,
        left,
        layout.anchor_y - half_h,
        left,
        layout.anchor_y + half_h,
        &format!("{}cm", size.height_cm),
        ref_size,
        line_color,
    );

    let right = layout.anchor_x + half_w + MATERIAL_GAP;
    draw_dimension_line_vertical(
        surface,
        font,
        right,
        layout.anchor_y + half_h - thickness,
        right,
        layout.anchor_y + half_h,
        &format!("{}mm", thickness_mm),
        ref_size,
        line_color,
    );
}

fn stroke(surface: &mut Pixmap, pb: PathBuilder, paint: &tiny_skia::Paint) {
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        surface.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}
