//! The rendering pipeline: background, contrast sampling, text fitting,
//! sign compositing, dimension overlay.
//!
//! One call draws one complete frame onto the caller's surface. Nothing in
//! here blocks on an asset: a missing background asks the caller to retry,
//! a missing texture degrades to the gray fallback, a missing font degrades
//! to the error-styled render. The surface is displayable after every call.

pub mod blur;
pub mod contrast;
pub mod dimensions;
pub mod layout;
pub mod material;
pub mod neon;
pub mod text;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ab_glyph::FontArc;
use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::assets::AssetCache;
use crate::config::{material_texture_key, RenderConfig, SignType};
use crate::fonts::FontLibrary;

use neon::NeonBrush;

/// Suggested delay before re-invoking a render that is waiting on its
/// background image.
pub const BACKGROUND_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Message drawn when the selected font cannot be loaded at all.
const FONT_ERROR_TEXT: &str = "Error Loading Font";
const FONT_ERROR_RGBA: [u8; 4] = [255, 0, 0, 255];

/// Outcome of one render call. Both variants leave the surface
/// displayable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    Completed,
    /// The background image is not in the cache yet. Re-invoke after
    /// `retry_after`; the pipeline never sleeps or blocks itself.
    AwaitingBackground { retry_after: Duration },
}

/// Monotonic render-generation counter. A caller that kicks off delayed
/// retries tags each with `begin()` and drops completions whose token is
/// no longer current, so a stale retry can't overwrite a newer frame.
#[derive(Debug, Default)]
pub struct RenderGeneration(AtomicU64);

impl RenderGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, invalidating all earlier tokens.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}

/// Render one frame of the configured sign onto `surface`.
pub fn render_preview(
    surface: &mut Pixmap,
    config: &RenderConfig,
    assets: &AssetCache,
    fonts: &mut FontLibrary,
) -> RenderStatus {
    surface.fill(Color::TRANSPARENT);

    let Some(background) = assets.get(&config.background) else {
        log::debug!(
            "background {} not cached yet, retry in {:?}",
            config.background,
            BACKGROUND_RETRY_DELAY
        );
        return RenderStatus::AwaitingBackground {
            retry_after: BACKGROUND_RETRY_DELAY,
        };
    };
    draw_background(surface, &background);

    // contrast must be sampled after the background, before any ink
    let line_color = contrast::sample_line_color(surface);

    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let text = config.effective_text();
    let base_size = layout::base_font_size(w);

    let Some(font) = fonts.resolve_named(&config.font_family) else {
        log::warn!(
            "font {:?} unavailable, drawing error fallback",
            config.font_family
        );
        if let Some(fallback) = fonts.resolve(None) {
            draw_font_error(surface, &fallback, base_size, w, h);
        } else {
            log::error!("no fallback font either; leaving background only");
        }
        return RenderStatus::Completed;
    };

    let fitted = layout::fit_text(&font, text, w, h);
    let label_font = fonts.resolve(None).unwrap_or_else(|| font.clone());

    match config.sign_type {
        SignType::Neon => {
            let brush = NeonBrush::from_spec(&config.color);
            neon::render_neon_text(surface, &font, text, &fitted, &brush, &neon::full_profile());
            dimensions::draw_neon_dimensions(
                surface,
                &label_font,
                &fitted,
                config.size_label,
                base_size,
                line_color,
            );
        }
        SignType::Material => {
            let texture_key = material_texture_key(&config.material);
            match assets.get(&texture_key) {
                Some(texture) => {
                    material::render_material_text(
                        surface,
                        &font,
                        text,
                        &fitted,
                        &texture,
                        config.thickness_mm(),
                    );
                    dimensions::draw_material_dimensions(
                        surface,
                        &label_font,
                        &fitted,
                        config.size_label,
                        config.thickness_mm(),
                        line_color,
                    );
                }
                None => {
                    log::debug!("texture {} not cached yet, gray fallback", texture_key);
                    material::render_fallback_text(surface, &font, text, &fitted);
                }
            }
        }
    }

    RenderStatus::Completed
}

fn draw_background(surface: &mut Pixmap, background: &Pixmap) {
    let sx = surface.width() as f32 / background.width() as f32;
    let sy = surface.height() as f32 / background.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    surface.draw_pixmap(
        0,
        0,
        background.as_ref(),
        &paint,
        Transform::from_scale(sx, sy),
        None,
    );
}

fn draw_font_error(surface: &mut Pixmap, font: &FontArc, size: f32, w: f32, h: f32) {
    if let Some(path) = text::build_text_path(
        font,
        FONT_ERROR_TEXT,
        size,
        w / 2.0,
        h * 0.4,
        text::Baseline::Middle,
    ) {
        text::fill_path(
            surface,
            &path,
            &text::paint_solid(FONT_ERROR_RGBA),
            Transform::identity(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::pixmap_from_rgba;
    use crate::config::{ColorSpec, SizeCm};
    use std::path::PathBuf;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn named_font_path() -> Option<PathBuf> {
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
        ]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    }

    fn solid_background(rgba: [u8; 4]) -> Pixmap {
        pixmap_from_rgba(4, 4, rgba.repeat(16)).unwrap()
    }

    fn neon_config() -> RenderConfig {
        RenderConfig {
            text: "ABC".to_string(),
            font_family: "Handsome".to_string(),
            sign_type: SignType::Neon,
            color: ColorSpec::Hex("#ff0000".to_string()),
            background: "assets/2.jpg".to_string(),
            material: "forex-10mm".to_string(),
            canvas_width: 800,
            canvas_height: 400,
            size_label: SizeCm {
                width_cm: 30,
                height_cm: 15,
            },
        }
    }

    #[test]
    fn missing_background_requests_retry() {
        init_logging();
        let mut surface = Pixmap::new(800, 400).unwrap();
        let assets = AssetCache::new();
        let mut fonts = FontLibrary::new();
        let status = render_preview(&mut surface, &neon_config(), &assets, &mut fonts);
        assert_eq!(
            status,
            RenderStatus::AwaitingBackground {
                retry_after: BACKGROUND_RETRY_DELAY
            }
        );
    }

    #[test]
    fn neon_scenario_completes_and_draws() {
        let Some(font_path) = named_font_path() else { return };
        let mut surface = Pixmap::new(800, 400).unwrap();
        let assets = AssetCache::new();
        assets.insert_if_absent("assets/2.jpg", solid_background([20, 20, 30, 255]));
        let mut fonts = FontLibrary::new();
        fonts.register("Handsome", font_path);

        let status = render_preview(&mut surface, &neon_config(), &assets, &mut fonts);
        assert_eq!(status, RenderStatus::Completed);

        // glow ink near the anchor (400, 160)
        let mut lit = 0;
        for y in 120..200 {
            for x in 300..500 {
                let px = surface.pixel(x, y).unwrap();
                if px.red() > 60 && px.red() > px.blue() {
                    lit += 1;
                }
            }
        }
        assert!(lit > 50, "expected red glow near anchor, found {lit}");
    }

    #[test]
    fn material_without_texture_falls_back_gray() {
        let Some(font_path) = named_font_path() else { return };
        let mut surface = Pixmap::new(800, 400).unwrap();
        let assets = AssetCache::new();
        assets.insert_if_absent("assets/2.jpg", solid_background([200, 200, 200, 255]));
        let mut fonts = FontLibrary::new();
        fonts.register("Handsome", font_path);

        let mut config = neon_config();
        config.sign_type = SignType::Material;

        let status = render_preview(&mut surface, &config, &assets, &mut fonts);
        assert_eq!(status, RenderStatus::Completed);

        let has_gray = surface.pixels().iter().any(|px| {
            px.alpha() == 255 && px.red() == 128 && px.green() == 128 && px.blue() == 128
        });
        assert!(has_gray, "expected gray fallback glyphs");
    }

    #[test]
    fn unknown_font_renders_error_text_not_panic() {
        let mut surface = Pixmap::new(400, 200).unwrap();
        let assets = AssetCache::new();
        assets.insert_if_absent("assets/2.jpg", solid_background([10, 10, 10, 255]));
        let mut fonts = FontLibrary::new(); // "Handsome" is not registered

        let status = render_preview(&mut surface, &neon_config(), &assets, &mut fonts);
        assert_eq!(status, RenderStatus::Completed);

        if crate::fonts::tests::test_font().is_some() {
            let has_red = surface
                .pixels()
                .iter()
                .any(|px| px.red() > 200 && px.green() < 60 && px.blue() < 60);
            assert!(has_red, "expected red error text");
        }
    }

    #[test]
    fn generation_tokens_invalidate_stale_completions() {
        let generation = RenderGeneration::new();
        let first = generation.begin();
        assert!(generation.is_current(first));
        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }
}
