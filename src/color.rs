//! Color plumbing shared by the compositors: hex literals in and out,
//! brightness math for the contrast sampler, and the fixed UI-swatch to
//! neon-tube color mapping.

/// Swatch hex -> the neon tube color actually painted. Colors outside the
/// table pass through as their own primary.
const NEON_COLOR_MAP: [(&str, &str); 10] = [
    ("#ff00ff", "#ff40a0"),
    ("#00e1ffff", "#00ffff"),
    ("#ffe600ff", "#ffff00"),
    ("#00ff00", "#00ff40"),
    ("#ff0000", "#ff0040"),
    ("#dee2e6", "#ffffff"),
    ("#ff6200", "#ff981a"),
    ("#a020f0", "#9d5eff"),
    ("#ff1493", "#ff40a0"),
    ("#32cd32", "#00ff40"),
];

/// Parse `#rrggbb` or `#rrggbbaa` into RGBA bytes.
pub fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    if !hex.starts_with('#') {
        return None;
    }
    let s = &hex[1..];
    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some([r, g, b, 255])
    } else if s.len() == 8 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        let a = u8::from_str_radix(&s[6..8], 16).ok()?;
        Some([r, g, b, a])
    } else {
        None
    }
}

/// Format RGBA bytes into `#rrggbb` or `#rrggbbaa` (lowercase hex).
pub fn format_hex(color: [u8; 4], alpha: bool) -> String {
    if alpha {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color[0], color[1], color[2], color[3]
        )
    } else {
        format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
    }
}

/// Rec. 601 luma of an RGB triple, rounded to the nearest integer.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8
}

/// Neon tube primary for a UI swatch color. Alpha digits in the key are
/// significant (two palette entries carry them).
pub fn neon_primary(color: &str) -> &str {
    NEON_COLOR_MAP
        .iter()
        .find(|(swatch, _)| *swatch == color)
        .map(|(_, primary)| *primary)
        .unwrap_or(color)
}

/// Darken a hex color by `amount` in [0, 1]. Channels are scaled in
/// contrast space about the mid-gray point, which keeps saturated tube
/// colors from washing out the way a plain per-channel multiply does.
/// `darken_color("#ff981a", 0.3)` yields `#c16a01`.
pub fn darken_color(hex: &str, amount: f32) -> String {
    let Some(rgba) = parse_hex(hex) else {
        return hex.to_string();
    };
    format_hex(darken_rgba(rgba, amount), false)
}

/// Channel-level form of [`darken_color`]; alpha passes through.
pub fn darken_rgba(rgba: [u8; 4], amount: f32) -> [u8; 4] {
    let s = (1.0 - amount).max(0.0).sqrt();
    let dark = |c: u8| ((c as f32 + 127.5) * s - 127.5).round().clamp(0.0, 255.0) as u8;
    [dark(rgba[0]), dark(rgba[1]), dark(rgba[2]), rgba[3]]
}

/// Dimension line/label color, decided once per render from the sampled
/// background brightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineColor {
    /// rgba(0, 0, 0, 0.95) — used over bright backgrounds.
    Dark,
    /// rgba(255, 255, 255, 0.95) — used over dark backgrounds.
    Light,
}

impl LineColor {
    pub fn rgba(self) -> [u8; 4] {
        match self {
            LineColor::Dark => [0, 0, 0, 242],
            LineColor::Light => [255, 255, 255, 242],
        }
    }
}
