//! Surface serialization for download: lossless PNG, max-quality JPEG.

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use tiny_skia::Pixmap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

/// Encode the surface to image bytes. PNG keeps the alpha channel and is
/// pixel-lossless; JPEG flattens to RGB at quality 100.
pub fn export_image(surface: &Pixmap, format: ExportFormat) -> Result<Vec<u8>> {
    let (w, h) = (surface.width(), surface.height());
    let rgba = demultiplied_rgba(surface);
    let mut buf: Vec<u8> = Vec::new();

    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut buf)
                .write_image(&rgba, w, h, ColorType::Rgba8)
                .context("png encoding failed")?;
        }
        ExportFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            JpegEncoder::new_with_quality(&mut buf, 100)
                .encode(&rgb, w, h, ColorType::Rgb8)
                .context("jpeg encoding failed")?;
        }
    }
    Ok(buf)
}

/// Straight-alpha RGBA bytes of the surface.
fn demultiplied_rgba(surface: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(surface.pixels().len() * 4);
    for px in surface.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}
