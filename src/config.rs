use serde::{Deserialize, Serialize};

/// Fallback preview text shown whenever the user has not typed anything.
pub const DEFAULT_TEXT: &str = "Farhan";

/// The fixed neon color palette, in the order the "multi" mode cycles it.
pub const NEON_PALETTE: [&str; 10] = [
    "#ff00ff", "#00e1ffff", "#ffe600ff", "#00ff00", "#ff0000", "#dee2e6", "#ff6200", "#a020f0",
    "#ff1493", "#32cd32",
];

/// Background scene asset keys known at startup.
pub const BACKGROUND_KEYS: [&str; 5] = [
    "assets/1.jpg",
    "assets/2.jpg",
    "assets/3.jpg",
    "assets/4.jpg",
    "assets/5.jpg",
];

/// Material key -> cut thickness in millimetres. 13 fixed entries; the
/// emboss depth and the thickness dimension line both read from here.
pub const MATERIAL_THICKNESS_MM: [(&str, u32); 13] = [
    ("forex-10mm", 10),
    ("forex-5mm", 5),
    ("forex-3mm", 3),
    ("mdf-3mm", 3),
    ("mdf-5mm", 5),
    ("mdf-9mm", 9),
    ("silver-mirror-2mm", 2),
    ("gold-mirror-2mm", 2),
    ("stainlesssteel-1mm", 1),
    ("acrylic-3mm", 3),
    ("acrylic-black-3mm", 3),
    ("acrylic-8mm", 8),
    ("acrylic-10mm", 10),
];

/// Thickness lookup. Unknown keys default to 3mm rather than erroring so a
/// stale or misspelled selection still produces a usable preview.
pub fn material_thickness_mm(material: &str) -> u32 {
    MATERIAL_THICKNESS_MM
        .iter()
        .find(|(k, _)| *k == material)
        .map(|(_, t)| *t)
        .unwrap_or(3)
}

/// Asset key for a material's texture image.
pub fn material_texture_key(material: &str) -> String {
    format!("assets/materials/{}.jpg", material)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignType {
    Neon,
    Material,
}

/// Color selection for a neon sign. `Multi` is owned by the shell's cycle
/// timer; the renderer only ever receives the color resolved for one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpec {
    Hex(String),
    Multi,
}

impl ColorSpec {
    /// Resolve the color used for frame `frame_index`. A plain hex spec is
    /// constant; `Multi` cycles the palette one entry per frame/tick.
    pub fn resolve_for_frame(&self, frame_index: usize) -> &str {
        match self {
            ColorSpec::Hex(hex) => hex,
            ColorSpec::Multi => NEON_PALETTE[frame_index % NEON_PALETTE.len()],
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, ColorSpec::Multi)
    }
}

/// Declared physical size of the selected product option, in centimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeCm {
    pub width_cm: u32,
    pub height_cm: u32,
}

/// One render call's complete input. Built fresh by the shell on every
/// state change; nothing inside the pipeline mutates or retains it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderConfig {
    pub text: String,
    pub font_family: String,
    pub sign_type: SignType,
    pub color: ColorSpec,
    pub background: String,
    pub material: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub size_label: SizeCm,
}

impl RenderConfig {
    /// Text to actually render; empty input keeps the preview alive with a
    /// literal fallback string.
    pub fn effective_text(&self) -> &str {
        if self.text.is_empty() {
            DEFAULT_TEXT
        } else {
            &self.text
        }
    }

    pub fn thickness_mm(&self) -> u32 {
        material_thickness_mm(&self.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_table_matches_documented_values() {
        assert_eq!(material_thickness_mm("forex-10mm"), 10);
        assert_eq!(material_thickness_mm("forex-5mm"), 5);
        assert_eq!(material_thickness_mm("forex-3mm"), 3);
        assert_eq!(material_thickness_mm("mdf-9mm"), 9);
        assert_eq!(material_thickness_mm("silver-mirror-2mm"), 2);
        assert_eq!(material_thickness_mm("gold-mirror-2mm"), 2);
        assert_eq!(material_thickness_mm("stainlesssteel-1mm"), 1);
        assert_eq!(material_thickness_mm("acrylic-8mm"), 8);
        assert_eq!(material_thickness_mm("acrylic-black-3mm"), 3);
        assert_eq!(MATERIAL_THICKNESS_MM.len(), 13);
    }

    #[test]
    fn unknown_material_defaults_to_3mm() {
        assert_eq!(material_thickness_mm("granite-40mm"), 3);
        assert_eq!(material_thickness_mm(""), 3);
    }

    #[test]
    fn empty_text_falls_back() {
        let mut cfg = test_config();
        cfg.text = String::new();
        assert_eq!(cfg.effective_text(), DEFAULT_TEXT);
        cfg.text = "ABC".to_string();
        assert_eq!(cfg.effective_text(), "ABC");
    }

    #[test]
    fn multi_color_cycles_palette() {
        let spec = ColorSpec::Multi;
        assert_eq!(spec.resolve_for_frame(0), NEON_PALETTE[0]);
        assert_eq!(spec.resolve_for_frame(3), NEON_PALETTE[3]);
        assert_eq!(spec.resolve_for_frame(10), NEON_PALETTE[0]);
        let fixed = ColorSpec::Hex("#ff0000".to_string());
        assert_eq!(fixed.resolve_for_frame(7), "#ff0000");
    }

    pub(crate) fn test_config() -> RenderConfig {
        RenderConfig {
            text: "ABC".to_string(),
            font_family: "Handsome".to_string(),
            sign_type: SignType::Neon,
            color: ColorSpec::Hex("#ff0000".to_string()),
            background: BACKGROUND_KEYS[1].to_string(),
            material: "forex-10mm".to_string(),
            canvas_width: 800,
            canvas_height: 400,
            size_label: SizeCm {
                width_cm: 30,
                height_cm: 15,
            },
        }
    }
}
