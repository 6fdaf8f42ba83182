use std::sync::LazyLock;

use eframe::egui::Color32;
use regex::Regex;

/// Default accent used for `**accent**` markup when fonts don't override it.
pub const DEFAULT_ACCENT: Color32 = Color32::from_rgb(0xF5, 0x9E, 0x0B);

pub const DEFAULT_THEME: &str = "dark";

/// Registered theme keys, in the order they are offered in the UI.
pub const THEME_NAMES: [&str; 5] = ["dark", "light", "midnight", "sunrise", "forest"];

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub label: &'static str,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub surface: Color32,
    pub muted: Color32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            label: "Dark",
            background: Color32::from_rgb(0x11, 0x11, 0x14),
            foreground: Color32::from_rgb(0xD4, 0xD4, 0xD8),
            heading_color: Color32::WHITE,
            accent: DEFAULT_ACCENT,
            surface: Color32::from_rgb(0x23, 0x23, 0x2A),
            muted: Color32::from_rgb(0x71, 0x71, 0x7A),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            label: "Light",
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x27, 0x27, 0x2A),
            heading_color: Color32::from_rgb(0x09, 0x09, 0x0B),
            accent: Color32::from_rgb(0xD9, 0x77, 0x06),
            surface: Color32::from_rgb(0xF4, 0xF4, 0xF5),
            muted: Color32::from_rgb(0xA1, 0xA1, 0xAA),
        }
    }

    pub fn midnight() -> Self {
        Self {
            name: "midnight".to_string(),
            label: "Midnight",
            background: Color32::from_rgb(0x0B, 0x10, 0x2A),
            foreground: Color32::from_rgb(0xC7, 0xD2, 0xFE),
            heading_color: Color32::from_rgb(0xEE, 0xF2, 0xFF),
            accent: Color32::from_rgb(0x38, 0xBD, 0xF8),
            surface: Color32::from_rgb(0x1E, 0x29, 0x4B),
            muted: Color32::from_rgb(0x64, 0x74, 0x8B),
        }
    }

    pub fn sunrise() -> Self {
        Self {
            name: "sunrise".to_string(),
            label: "Sunrise",
            background: Color32::from_rgb(0xFF, 0xF7, 0xED),
            foreground: Color32::from_rgb(0x43, 0x14, 0x07),
            heading_color: Color32::from_rgb(0x7C, 0x2D, 0x12),
            accent: Color32::from_rgb(0xEA, 0x58, 0x0C),
            surface: Color32::from_rgb(0xFF, 0xED, 0xD5),
            muted: Color32::from_rgb(0xC2, 0x41, 0x0C),
        }
    }

    pub fn forest() -> Self {
        Self {
            name: "forest".to_string(),
            label: "Forest",
            background: Color32::from_rgb(0x05, 0x2E, 0x16),
            foreground: Color32::from_rgb(0xBB, 0xF7, 0xD0),
            heading_color: Color32::from_rgb(0xF0, 0xFD, 0xF4),
            accent: Color32::from_rgb(0xFA, 0xCC, 0x15),
            surface: Color32::from_rgb(0x14, 0x53, 0x2D),
            muted: Color32::from_rgb(0x4A, 0xDE, 0x80),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "midnight" => Some(Self::midnight()),
            "sunrise" => Some(Self::sunrise()),
            "forest" => Some(Self::forest()),
            _ => None,
        }
    }

    /// Resolve a stored theme key, falling back to the default theme.
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(Self::from_name).unwrap_or_else(Self::dark)
    }

    pub fn is_known(name: &str) -> bool {
        THEME_NAMES.contains(&name)
    }

    /// The theme after this one in registry order.
    pub fn next(&self) -> Self {
        let idx = THEME_NAMES
            .iter()
            .position(|n| *n == self.name)
            .unwrap_or(0);
        Self::resolve(Some(THEME_NAMES[(idx + 1) % THEME_NAMES.len()]))
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    pub fn is_dark(&self) -> bool {
        let bg = self.background;
        (bg.r() as u32 + bg.g() as u32 + bg.b() as u32) < 384
    }
}

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9a-fA-F]{6})$").expect("valid hex color regex"));

/// Parse a `#RRGGBB` color as stored in font settings.
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let caps = HEX_COLOR.captures(value.trim())?;
    let hex = caps.get(1)?.as_str();
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

pub fn to_hex_color(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registered_theme_resolves() {
        for name in THEME_NAMES {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert!(Theme::from_name("neon").is_none());
        assert_eq!(Theme::resolve(Some("neon")).name, DEFAULT_THEME);
        assert_eq!(Theme::resolve(None).name, DEFAULT_THEME);
    }

    #[test]
    fn test_next_cycles() {
        assert_eq!(Theme::dark().next().name, "light");
        assert_eq!(Theme::forest().next().name, "dark");
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_hex_color("#F59E0B"), Some(DEFAULT_ACCENT));
        assert_eq!(parse_hex_color("f59e0b"), Some(DEFAULT_ACCENT));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("amber"), None);
        assert_eq!(to_hex_color(DEFAULT_ACCENT), "#F59E0B");
    }

    #[test]
    fn test_dark_detection() {
        assert!(Theme::dark().is_dark());
        assert!(!Theme::light().is_dark());
    }
}
