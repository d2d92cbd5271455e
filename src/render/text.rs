//! Glyph outlines to tiny-skia paths.
//!
//! Every compositor fills text through here: a run of glyphs becomes one
//! `Path` (advance + kerning accumulation, contours split on coordinate
//! jumps) that can then be filled with any shader — solid, gradient or
//! texture pattern.

use ab_glyph::{Font, FontArc, OutlineCurve, ScaleFont};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

/// Vertical anchor for a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    /// Anchor sits at the vertical middle of the ascent/descent band
    /// (canvas `textBaseline = "middle"`).
    Middle,
    /// Anchor is the text baseline itself (canvas `"bottom"`, near enough
    /// for short dimension labels).
    Bottom,
}

/// Measured advance width of `text` at `size_px`, kerning included.
pub fn measure_width(font: &FontArc, text: &str, size_px: f32) -> f32 {
    let scaled = font.as_scaled(ab_glyph::PxScale::from(size_px));
    let mut total = 0.0f32;
    let mut prev: Option<ab_glyph::GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            total += scaled.kern(p, id);
        }
        total += scaled.h_advance(id);
        prev = Some(id);
    }
    total
}

/// Build one filled path for `text`, horizontally centered on `anchor_x`
/// and vertically anchored per `baseline`. Returns `None` for runs with no
/// drawable outline (e.g. all spaces).
pub fn build_text_path(
    font: &FontArc,
    text: &str,
    size_px: f32,
    anchor_x: f32,
    anchor_y: f32,
    baseline: Baseline,
) -> Option<Path> {
    let scale = ab_glyph::PxScale::from(size_px);
    let scaled = font.as_scaled(scale);
    let width = measure_width(font, text, size_px);

    // ab_glyph outline points are unscaled font units with y up; the scale
    // factors below match what OutlinedGlyph::draw applies internally.
    let h_factor = scaled.h_scale_factor();
    let v_factor = -scaled.v_scale_factor();

    let baseline_y = match baseline {
        Baseline::Middle => anchor_y + (scaled.ascent() + scaled.descent()) / 2.0,
        Baseline::Bottom => anchor_y,
    };

    let mut pb = PathBuilder::new();
    let mut cursor_x = anchor_x - width / 2.0;
    let mut prev: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            cursor_x += scaled.kern(p, id);
        }
        prev = Some(id);

        if let Some(outline) = font.outline(id) {
            append_glyph_contours(
                &mut pb,
                &outline.curves,
                h_factor,
                v_factor,
                cursor_x,
                baseline_y,
            );
        }
        cursor_x += scaled.h_advance(id);
    }

    pb.finish()
}

/// Append one glyph's contours. A new contour starts wherever consecutive
/// curves don't connect end-to-start.
fn append_glyph_contours(
    pb: &mut PathBuilder,
    curves: &[OutlineCurve],
    h_factor: f32,
    v_factor: f32,
    pos_x: f32,
    pos_y: f32,
) {
    let map = |p: ab_glyph::Point| (p.x * h_factor + pos_x, p.y * v_factor + pos_y);
    let mut last_end: Option<ab_glyph::Point> = None;
    let mut open = false;

    for curve in curves {
        let (start, end) = match curve {
            OutlineCurve::Line(p0, p1) => (*p0, *p1),
            OutlineCurve::Quad(p0, _, p2) => (*p0, *p2),
            OutlineCurve::Cubic(p0, _, _, p3) => (*p0, *p3),
        };

        let disconnected = match last_end {
            None => true,
            Some(le) => (start.x - le.x).abs() > 0.1 || (start.y - le.y).abs() > 0.1,
        };
        if disconnected {
            if open {
                pb.close();
            }
            let (sx, sy) = map(start);
            pb.move_to(sx, sy);
            open = true;
        }

        match curve {
            OutlineCurve::Line(_, p1) => {
                let (x, y) = map(*p1);
                pb.line_to(x, y);
            }
            OutlineCurve::Quad(_, p1, p2) => {
                let (cx, cy) = map(*p1);
                let (x, y) = map(*p2);
                pb.quad_to(cx, cy, x, y);
            }
            OutlineCurve::Cubic(_, p1, p2, p3) => {
                let (c1x, c1y) = map(*p1);
                let (c2x, c2y) = map(*p2);
                let (x, y) = map(*p3);
                pb.cubic_to(c1x, c1y, c2x, c2y, x, y);
            }
        }
        last_end = Some(end);
    }
    if open {
        pb.close();
    }
}

/// Solid anti-aliased paint for RGBA bytes.
pub fn paint_solid(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

/// Fill a text path on the surface with an optional extra transform
/// (emboss offsets, label rotation).
pub fn fill_path(pixmap: &mut Pixmap, path: &Path, paint: &Paint, transform: Transform) {
    pixmap.fill_path(path, paint, FillRule::Winding, transform, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::tests::test_font;

    #[test]
    fn measure_is_monotonic_in_text_length() {
        let Some(font) = test_font() else { return };
        let short = measure_width(&font, "AB", 40.0);
        let long = measure_width(&font, "ABCD", 40.0);
        assert!(long > short);
        assert_eq!(measure_width(&font, "", 40.0), 0.0);
    }

    #[test]
    fn path_is_centered_on_anchor() {
        let Some(font) = test_font() else { return };
        let path = build_text_path(&font, "HH", 60.0, 200.0, 100.0, Baseline::Middle)
            .expect("drawable path");
        let bounds = path.bounds();
        let center = (bounds.left() + bounds.right()) / 2.0;
        // side bearings make this approximate
        assert!((center - 200.0).abs() < 6.0, "center {center}");
        assert!(bounds.top() < 100.0 && bounds.bottom() > 100.0);
    }

    #[test]
    fn whitespace_has_no_path() {
        let Some(font) = test_font() else { return };
        assert!(build_text_path(&font, "   ", 40.0, 50.0, 50.0, Baseline::Middle).is_none());
    }
}
