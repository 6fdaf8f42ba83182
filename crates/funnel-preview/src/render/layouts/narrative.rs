use eframe::egui::{self, Pos2};

use super::{SlideRegions, SlideStyle};
use crate::model::SlideLayout;
use crate::render::text;
use crate::theme::Theme;

/// Body-only slide: large running text, vertically centered, with an accent
/// bar along its left edge.
pub fn render(
    ui: &egui::Ui,
    body: &str,
    style: &SlideStyle,
    rect: egui::Rect,
    hide_text: bool,
) -> SlideRegions {
    let content_rect = rect.shrink(style.padding());
    let width = content_rect.width() * 0.9;
    let left = content_rect.left() + (content_rect.width() - width) / 2.0;
    let text_style = style.body(SlideLayout::Narrative);

    let galley = text::layout_markup(ui, body, &text_style, width, egui::Align::LEFT);
    let height = galley.rect.height();
    let top = (content_rect.center().y - height / 2.0).max(content_rect.top());
    let pos = Pos2::new(left, top);
    let region = text::galley_rect(&galley, pos, width, egui::Align::LEFT);

    let bar = egui::Rect::from_min_size(
        Pos2::new(left - 28.0 * style.scale, top),
        egui::vec2(6.0 * style.scale, height),
    );
    let accent = Theme::with_opacity(style.fonts.accent(), 0.8);
    ui.painter().rect_filled(bar, 3.0 * style.scale, accent);
    if !hide_text {
        ui.painter().galley(pos, galley, text_style.color);
    }

    SlideRegions {
        headline: None,
        body: Some(region),
    }
}
