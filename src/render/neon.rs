//! Multi-pass neon glow compositing.
//!
//! Each pass paints the same text path into a scratch layer, blurs it, and
//! composites the layer back with the pass opacity. Soft wide passes go
//! first, the sharp core last; the exact stack is a visual-tuning artifact,
//! so it is expressed as data (`GlowPass`) with the two known profiles
//! provided as constructors.

use tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, Pixmap, PixmapPaint, Point, Shader, SpreadMode,
    Transform,
};

use ab_glyph::FontArc;

use crate::color::{darken_rgba, neon_primary, parse_hex};
use crate::config::{ColorSpec, NEON_PALETTE};

use super::blur::blur_premultiplied;
use super::layout::TextLayout;
use super::text::{build_text_path, fill_path, Baseline};

/// Amount the drop-shadow pass darkens the primary by.
const SHADOW_DARKEN: f32 = 0.3;

/// Fill override for a single glow pass; `None` in [`GlowPass::color`]
/// means "the resolved brush".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassColor {
    /// Primary darkened by [`SHADOW_DARKEN`] (drop-shadow pass).
    Darker,
    /// Sharp white (core / highlight passes).
    White,
}

/// One entry of the glow stack: blur radius in canvas `shadowBlur` terms,
/// composite opacity (`None` = opaque), fill override, and pixel offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowPass {
    pub blur: f32,
    pub alpha: Option<f32>,
    pub color: Option<PassColor>,
    pub offset: (f32, f32),
}

impl GlowPass {
    fn soft(blur: f32, alpha: Option<f32>) -> Self {
        GlowPass {
            blur,
            alpha,
            color: None,
            offset: (0.0, 0.0),
        }
    }
}

/// The two-pass glow plus white core of the first legacy revision.
pub fn minimal_profile() -> Vec<GlowPass> {
    vec![
        GlowPass::soft(20.0, None),
        GlowPass::soft(10.0, None),
        GlowPass {
            blur: 0.0,
            alpha: None,
            color: Some(PassColor::White),
            offset: (0.0, 0.0),
        },
    ]
}

/// The richer stack: ten descending soft passes with rising opacity, a 1px
/// dark drop shadow, an opaque core pass, and a near-white highlight.
pub fn full_profile() -> Vec<GlowPass> {
    const BLURS: [f32; 10] = [40.0, 32.0, 28.0, 24.0, 20.0, 16.0, 13.0, 10.0, 6.0, 3.0];
    let mut passes: Vec<GlowPass> = BLURS
        .iter()
        .enumerate()
        .map(|(i, &blur)| GlowPass::soft(blur, Some(0.3 + 0.7 * i as f32 / 9.0)))
        .collect();
    passes.push(GlowPass {
        blur: 1.0,
        alpha: None,
        color: Some(PassColor::Darker),
        offset: (1.0, 1.0),
    });
    passes.push(GlowPass::soft(0.0, None));
    passes.push(GlowPass {
        blur: 0.0,
        alpha: Some(0.9),
        color: Some(PassColor::White),
        offset: (0.0, 0.0),
    });
    passes
}

/// Resolved fill for the glow stack: a single tube color or the rainbow
/// gradient colors.
#[derive(Clone, Debug, PartialEq)]
pub enum NeonBrush {
    Solid([u8; 4]),
    Gradient(Vec<[u8; 4]>),
}

impl NeonBrush {
    /// Map a frame's color selection to its brush: hex goes through the
    /// neon tube table, "multi" becomes the full-palette gradient.
    pub fn from_spec(spec: &ColorSpec) -> Self {
        match spec {
            ColorSpec::Hex(hex) => {
                let primary = parse_hex(neon_primary(hex)).unwrap_or([255, 255, 255, 255]);
                NeonBrush::Solid(primary)
            }
            ColorSpec::Multi => NeonBrush::Gradient(
                NEON_PALETTE
                    .iter()
                    .filter_map(|hex| parse_hex(hex))
                    .collect(),
            ),
        }
    }

    fn darkened(&self) -> NeonBrush {
        match self {
            NeonBrush::Solid(c) => NeonBrush::Solid(darken_rgba(*c, SHADOW_DARKEN)),
            NeonBrush::Gradient(cs) => {
                NeonBrush::Gradient(cs.iter().map(|c| darken_rgba(*c, SHADOW_DARKEN)).collect())
            }
        }
    }
}

/// Evenly spaced gradient stops: color `i` of `n` sits at `i / n`.
pub fn gradient_stops(colors: &[[u8; 4]]) -> Vec<(f32, [u8; 4])> {
    let n = colors.len();
    colors
        .iter()
        .enumerate()
        .map(|(i, &c)| (i as f32 / n as f32, c))
        .collect()
}

fn brush_shader(brush: &NeonBrush, layout: &TextLayout) -> Option<Shader<'static>> {
    match brush {
        NeonBrush::Solid(c) => Some(Shader::SolidColor(Color::from_rgba8(c[0], c[1], c[2], c[3]))),
        NeonBrush::Gradient(colors) => {
            let stops: Vec<GradientStop> = gradient_stops(colors)
                .into_iter()
                .map(|(pos, c)| {
                    GradientStop::new(pos, Color::from_rgba8(c[0], c[1], c[2], c[3]))
                })
                .collect();
            LinearGradient::new(
                Point::from_xy(layout.anchor_x - layout.text_width_px / 2.0, layout.anchor_y),
                Point::from_xy(layout.anchor_x + layout.text_width_px / 2.0, layout.anchor_y),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )
        }
    }
}

fn pass_shader(
    pass: &GlowPass,
    brush: &NeonBrush,
    layout: &TextLayout,
) -> Option<Shader<'static>> {
    match pass.color {
        None => brush_shader(brush, layout),
        Some(PassColor::Darker) => brush_shader(&brush.darkened(), layout),
        Some(PassColor::White) => Some(Shader::SolidColor(Color::WHITE)),
    }
}

/// Paint the glow stack for `text` onto the surface. Pure side effect; a
/// run with no drawable outline (all whitespace) paints nothing.
pub fn render_neon_text(
    surface: &mut Pixmap,
    font: &FontArc,
    text: &str,
    layout: &TextLayout,
    brush: &NeonBrush,
    profile: &[GlowPass],
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

    let (w, h) = (surface.width(), surface.height());
    for pass in profile {
        let Some(shader) = pass_shader(pass, brush, layout) else {
            continue;
        };
        let Some(mut scratch) = Pixmap::new(w, h) else {
            return;
        };

        let mut paint = Paint::default();
        paint.shader = shader;
        paint.anti_alias = true;
        fill_path(
            &mut scratch,
            &path,
            &paint,
            Transform::from_translate(pass.offset.0, pass.offset.1),
        );

        if pass.blur > 0.0 {
            blur_premultiplied(scratch.data_mut(), w, h, pass.blur);
        }

        let composite = PixmapPaint {
            opacity: pass.alpha.unwrap_or(1.0),
            ..PixmapPaint::default()
        };
        surface.draw_pixmap(0, 0, scratch.as_ref(), &composite, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::tests::test_font;
    use crate::render::layout::fit_text;

    #[test]
    fn minimal_profile_shape() {
        let p = minimal_profile();
        assert_eq!(p.len(), 3);
        assert_eq!(p[0].blur, 20.0);
        assert_eq!(p[1].blur, 10.0);
        assert_eq!(p[2].blur, 0.0);
        assert_eq!(p[2].color, Some(PassColor::White));
    }

    #[test]
    fn full_profile_descends_in_blur_and_rises_in_alpha() {
        let p = full_profile();
        assert!(p.len() >= 3);
        for win in p[..10].windows(2) {
            assert!(win[0].blur > win[1].blur);
            assert!(win[0].alpha.unwrap() < win[1].alpha.unwrap());
        }
        assert_eq!(p[0].alpha, Some(0.3));
        assert_eq!(p[9].alpha, Some(1.0));
        // shadow pass is offset and darkened
        assert_eq!(p[10].color, Some(PassColor::Darker));
        assert_eq!(p[10].offset, (1.0, 1.0));
    }

    #[test]
    fn gradient_stops_are_i_over_n() {
        let colors: Vec<[u8; 4]> = NEON_PALETTE.iter().filter_map(|h| parse_hex(h)).collect();
        let stops = gradient_stops(&colors);
        assert_eq!(stops.len(), 10);
        for (i, (pos, _)) in stops.iter().enumerate() {
            assert!((pos - i as f32 / 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn multi_spec_resolves_to_palette_gradient() {
        match NeonBrush::from_spec(&ColorSpec::Multi) {
            NeonBrush::Gradient(colors) => assert_eq!(colors.len(), NEON_PALETTE.len()),
            other => panic!("expected gradient, got {:?}", other),
        }
        match NeonBrush::from_spec(&ColorSpec::Hex("#ff6200".to_string())) {
            NeonBrush::Solid(c) => assert_eq!(c, [0xff, 0x98, 0x1a, 255]),
            other => panic!("expected solid, got {:?}", other),
        }
    }

    #[test]
    fn glow_render_lights_up_the_surface() {
        let Some(font) = test_font() else { return };
        let mut surface = Pixmap::new(400, 200).unwrap();
        let layout = fit_text(&font, "NEON", 400.0, 200.0);
        let brush = NeonBrush::from_spec(&ColorSpec::Hex("#ff0000".to_string()));
        render_neon_text(
            &mut surface,
            &font,
            "NEON",
            &layout,
            &brush,
            &minimal_profile(),
        );

        let lit = surface
            .pixels()
            .iter()
            .filter(|px| px.alpha() > 0)
            .count();
        assert!(lit > 100, "only {lit} pixels lit");
        // the core pass should leave some near-white pixels
        let has_core = surface
            .pixels()
            .iter()
            .any(|px| px.alpha() > 200 && px.red() > 200 && px.green() > 200 && px.blue() > 200);
        assert!(has_core);
    }

    #[test]
    fn whitespace_text_draws_nothing() {
        let Some(font) = test_font() else { return };
        let mut surface = Pixmap::new(100, 50).unwrap();
        let layout = fit_text(&font, " ", 100.0, 50.0);
        render_neon_text(
            &mut surface,
            &font,
            " ",
            &layout,
            &NeonBrush::Solid([255, 0, 0, 255]),
            &full_profile(),
        );
        assert!(surface.pixels().iter().all(|px| px.alpha() == 0));
    }
}
