use eframe::egui::{Color32, FontFamily};
use serde::{Deserialize, Serialize};

use crate::model::SlideLayout;
use crate::theme::{self, DEFAULT_ACCENT, Theme};

/// Font families offered in the font panel.
pub const FONT_FAMILIES: [&str; 8] = [
    "Inter",
    "Montserrat",
    "Poppins",
    "Oswald",
    "Bebas Neue",
    "Playfair Display",
    "Merriweather",
    "JetBrains Mono",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStep {
    Small,
    #[default]
    Medium,
    Large,
    Xl,
}

impl SizeStep {
    pub const ALL: [SizeStep; 4] = [Self::Small, Self::Medium, Self::Large, Self::Xl];

    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Xl => "XL",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Headline size in reference pixels (1920x1080 canvas).
    /// Statement slides use a larger table than standard slides.
    pub fn headline_px(self, layout: SlideLayout) -> f32 {
        const STATEMENT: [f32; 4] = [88.0, 108.0, 132.0, 156.0];
        const STANDARD: [f32; 4] = [56.0, 68.0, 80.0, 96.0];
        match layout {
            SlideLayout::Statement => STATEMENT[self.index()],
            _ => STANDARD[self.index()],
        }
    }

    /// Body size in reference pixels. Narrative slides use a larger table.
    pub fn body_px(self, layout: SlideLayout) -> f32 {
        const NARRATIVE: [f32; 4] = [46.0, 56.0, 66.0, 78.0];
        const STANDARD: [f32; 4] = [32.0, 38.0, 44.0, 52.0];
        match layout {
            SlideLayout::Narrative => NARRATIVE[self.index()],
            _ => STANDARD[self.index()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Semibold,
    Bold,
    Black,
}

impl FontWeight {
    pub const ALL: [FontWeight; 5] = [
        Self::Light,
        Self::Regular,
        Self::Semibold,
        Self::Bold,
        Self::Black,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Regular => "Regular",
            Self::Semibold => "Semibold",
            Self::Bold => "Bold",
            Self::Black => "Black",
        }
    }

    /// egui has no font weights; heavier weights are rendered slightly larger.
    pub fn size_boost(self) -> f32 {
        match self {
            Self::Light | Self::Regular => 0.0,
            Self::Semibold => 1.0,
            Self::Bold => 2.0,
            Self::Black => 3.0,
        }
    }
}

/// Presentation-level typography. Persisted as the presentation's `fontSettings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSettings {
    pub headline_font: String,
    pub body_font: String,
    pub headline_size: SizeStep,
    pub body_size: SizeStep,
    pub headline_weight: FontWeight,
    pub body_weight: FontWeight,
    /// `#RRGGBB`; empty means "use the theme's heading color".
    pub headline_color: String,
    /// `#RRGGBB`; empty means "use the theme's foreground".
    pub body_color: String,
    pub headline_uppercase: bool,
    pub accent_color: String,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            headline_font: "Inter".to_string(),
            body_font: "Inter".to_string(),
            headline_size: SizeStep::Medium,
            body_size: SizeStep::Medium,
            headline_weight: FontWeight::Bold,
            body_weight: FontWeight::Regular,
            headline_color: String::new(),
            body_color: String::new(),
            headline_uppercase: false,
            accent_color: theme::to_hex_color(DEFAULT_ACCENT),
        }
    }
}

impl FontSettings {
    pub fn headline_color(&self, theme: &Theme) -> Color32 {
        theme::parse_hex_color(&self.headline_color).unwrap_or(theme.heading_color)
    }

    pub fn body_color(&self, theme: &Theme) -> Color32 {
        theme::parse_hex_color(&self.body_color).unwrap_or(theme.foreground)
    }

    pub fn accent(&self) -> Color32 {
        theme::parse_hex_color(&self.accent_color).unwrap_or(DEFAULT_ACCENT)
    }
}

/// Map a configured family name onto the families egui ships with.
pub fn egui_family(name: &str) -> FontFamily {
    if name.to_ascii_lowercase().contains("mono") {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    }
}

/// Local font editing state with dirty tracking against the last saved snapshot.
#[derive(Debug, Clone)]
pub struct FontPanel {
    fonts: FontSettings,
    saved: FontSettings,
    pub open: bool,
}

impl FontPanel {
    pub fn new(settings: FontSettings) -> Self {
        Self {
            fonts: settings.clone(),
            saved: settings,
            open: false,
        }
    }

    pub fn fonts(&self) -> &FontSettings {
        &self.fonts
    }

    pub fn is_dirty(&self) -> bool {
        self.fonts != self.saved
    }

    pub fn update(&mut self, apply: impl FnOnce(&mut FontSettings)) {
        apply(&mut self.fonts);
    }

    /// Mark the current draft as saved and close the panel. The caller
    /// persists the returned settings; the panel does not wait for it.
    pub fn save(&mut self) -> FontSettings {
        self.saved = self.fonts.clone();
        self.open = false;
        self.fonts.clone()
    }

    pub fn revert(&mut self) {
        self.fonts = self.saved.clone();
    }

    pub fn reset_to_defaults(&mut self) {
        self.fonts = FontSettings::default();
    }
}
