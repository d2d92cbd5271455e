//! Interactive sign-preview rendering.
//!
//! The crate draws photorealistic previews of custom signs — neon tubes or
//! cut solid material — over a scene photo, entirely on the CPU:
//!
//! * [`config`] describes one frame's worth of input (text, font, color,
//!   background scene, material, declared product size).
//! * [`assets`] loads and caches the background and texture images off the
//!   render path.
//! * [`fonts`] discovers and decodes font faces, with a system fallback.
//! * [`render`] is the pipeline itself: adaptive text fitting, multi-pass
//!   neon glow or textured extrusion, contrast-aware dimension overlays.
//! * [`export`] serializes a finished surface to PNG or JPEG bytes.
//!
//! The pipeline is deterministic: the same [`config::RenderConfig`] over
//! the same cached assets always produces the same pixels.

pub mod assets;
pub mod color;
pub mod config;
pub mod export;
pub mod fonts;
pub mod render;

pub use assets::AssetCache;
pub use config::{ColorSpec, RenderConfig, SignType, SizeCm};
pub use export::{export_image, ExportFormat};
pub use fonts::FontLibrary;
pub use render::{render_preview, RenderGeneration, RenderStatus, BACKGROUND_RETRY_DELAY};
