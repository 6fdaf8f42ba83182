pub mod narrative;
pub mod standard;
pub mod statement;

use eframe::egui;

use crate::fonts::{self, FontSettings};
use crate::model::SlideLayout;
use crate::render::text::TextStyle;
use crate::theme::Theme;

/// Everything a layout needs to style text, resolved once per frame.
pub struct SlideStyle<'a> {
    pub theme: &'a Theme,
    pub fonts: &'a FontSettings,
    pub scale: f32,
}

impl SlideStyle<'_> {
    pub fn padding(&self) -> f32 {
        96.0 * self.scale
    }

    pub fn headline(&self, layout: SlideLayout) -> TextStyle {
        let f = self.fonts;
        TextStyle {
            size: (f.headline_size.headline_px(layout) + f.headline_weight.size_boost())
                * self.scale,
            family: fonts::egui_family(&f.headline_font),
            color: f.headline_color(self.theme),
            accent: f.accent(),
            uppercase: f.headline_uppercase,
        }
    }

    pub fn body(&self, layout: SlideLayout) -> TextStyle {
        let f = self.fonts;
        TextStyle {
            size: (f.body_size.body_px(layout) + f.body_weight.size_boost()) * self.scale,
            family: fonts::egui_family(&f.body_font),
            color: f.body_color(self.theme),
            accent: f.accent(),
            uppercase: false,
        }
    }
}

/// Screen regions occupied by each text field, used as click targets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlideRegions {
    pub headline: Option<egui::Rect>,
    pub body: Option<egui::Rect>,
}
