//! Font discovery and resolution.
//!
//! Named faces come from `.ttf`/`.otf` files found under the asset font
//! directory; a small list of system candidates backs everything up so the
//! preview can always fall back to *some* face. Resolution failures are the
//! caller's signal to switch to the error-styled render.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use once_cell::sync::Lazy;

/// System faces to try when a named font is missing or unreadable.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Name -> path map plus a decoded-face cache. The cache only ever grows;
/// font files don't change underneath a running preview.
#[derive(Default)]
pub struct FontLibrary {
    font_map: HashMap<String, PathBuf>,
    arc_cache: HashMap<String, FontArc>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `dir` recursively for font files, keyed by file stem.
    pub fn scan_dir(dir: &Path) -> Self {
        let mut fonts = Vec::new();
        scan_fonts_recursive(dir, &mut fonts);
        fonts.sort_by(|a, b| a.0.cmp(&b.0));
        fonts.dedup_by(|a, b| a.0 == b.0);
        Self {
            font_map: fonts.into_iter().collect(),
            arc_cache: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, path: PathBuf) {
        self.font_map.entry(name.to_string()).or_insert(path);
    }

    pub fn known_fonts(&self) -> impl Iterator<Item = &str> {
        self.font_map.keys().map(|s| s.as_str())
    }

    /// Resolve exactly the named face, no fallback. `None` here is what the
    /// renderer treats as a font-load failure (it then switches to the
    /// error-styled render with the system face).
    pub fn resolve_named(&mut self, name: &str) -> Option<FontArc> {
        if let Some(f) = self.arc_cache.get(name) {
            return Some(f.clone());
        }
        let path = self.font_map.get(name)?;
        match load_font_arc(path) {
            Some(font) => {
                self.arc_cache.insert(name.to_string(), font.clone());
                Some(font)
            }
            None => {
                log::warn!("font {:?} at {:?} failed to parse", name, path);
                None
            }
        }
    }

    /// Resolve a face by name with system fallback; returns `None` only
    /// when no usable font exists anywhere.
    pub fn resolve(&mut self, name: Option<&str>) -> Option<FontArc> {
        match name {
            Some(n) if !n.is_empty() => self.resolve_named(n).or_else(|| self.system_font()),
            _ => self.system_font(),
        }
    }

    fn system_font(&mut self) -> Option<FontArc> {
        if let Some(font) = SYSTEM_FONT.clone() {
            return Some(font);
        }
        if let Some(f) = self.arc_cache.get("__system__") {
            return Some(f.clone());
        }
        // last resort: any font we know about
        let paths: Vec<PathBuf> = self.font_map.values().cloned().collect();
        for path in paths {
            if let Some(font) = load_font_arc(&path) {
                self.arc_cache.insert("__system__".to_string(), font.clone());
                return Some(font);
            }
        }
        log::error!("no usable font found anywhere");
        None
    }
}

/// Decoded once per process; font files under the system paths don't move.
static SYSTEM_FONT: Lazy<Option<FontArc>> = Lazy::new(|| {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .find_map(|candidate| load_font_arc(Path::new(candidate)))
});

fn scan_fonts_recursive(dir: &Path, out: &mut Vec<(String, PathBuf)>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                scan_fonts_recursive(&path, out);
            } else if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if ext == "ttf" || ext == "otf" {
                    if let Some(name) = path.file_stem() {
                        out.push((name.to_string_lossy().to_string(), path));
                    }
                }
            }
        }
    }
}

pub fn load_font_arc(path: &Path) -> Option<FontArc> {
    let data = fs::read(path).ok()?;
    FontArc::try_from_vec(data).ok()
}
