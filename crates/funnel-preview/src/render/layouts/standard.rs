use eframe::egui::{self, Pos2};

use super::{SlideRegions, SlideStyle};
use crate::model::{SlideField, SlideLayout};
use crate::render::text;

/// Headline above body, left aligned, with an accent rule between them.
/// The pair is vertically centered when it fits.
pub fn render(
    ui: &egui::Ui,
    headline: &str,
    body: &str,
    style: &SlideStyle,
    rect: egui::Rect,
    hidden: Option<SlideField>,
) -> SlideRegions {
    let content_rect = rect.shrink(style.padding());
    let width = content_rect.width();
    let headline_style = style.headline(SlideLayout::Standard);
    let body_style = style.body(SlideLayout::Standard);
    let rule_gap = 36.0 * style.scale;

    let headline_galley =
        text::layout_markup(ui, headline, &headline_style, width, egui::Align::LEFT);
    let body_galley = text::layout_markup(ui, body, &body_style, width, egui::Align::LEFT);
    let total = headline_galley.rect.height() + rule_gap * 2.0 + body_galley.rect.height();

    let mut y = (content_rect.center().y - total / 2.0).max(content_rect.top());
    let x = content_rect.left();

    let headline_pos = Pos2::new(x, y);
    let headline_region =
        text::galley_rect(&headline_galley, headline_pos, width, egui::Align::LEFT);
    y += headline_galley.rect.height() + rule_gap;
    if hidden != Some(SlideField::Headline) {
        ui.painter()
            .galley(headline_pos, headline_galley, headline_style.color);
    }

    let rule = egui::Rect::from_min_size(
        Pos2::new(x, y - 4.0 * style.scale),
        egui::vec2(120.0 * style.scale, 6.0 * style.scale),
    );
    ui.painter()
        .rect_filled(rule, 3.0 * style.scale, style.fonts.accent());
    y += rule_gap;

    let body_pos = Pos2::new(x, y);
    let body_region = text::galley_rect(&body_galley, body_pos, width, egui::Align::LEFT);
    if hidden != Some(SlideField::Body) {
        ui.painter().galley(body_pos, body_galley, body_style.color);
    }

    SlideRegions {
        headline: Some(headline_region),
        body: Some(body_region),
    }
}
