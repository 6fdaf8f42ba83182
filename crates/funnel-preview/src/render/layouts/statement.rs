use eframe::egui::{self, Pos2};

use super::{SlideRegions, SlideStyle};
use crate::model::SlideLayout;
use crate::render::text;

/// Headline-only slide: one large line of text centered on the canvas.
pub fn render(
    ui: &egui::Ui,
    headline: &str,
    style: &SlideStyle,
    rect: egui::Rect,
    hide_text: bool,
) -> SlideRegions {
    let content_rect = rect.shrink(style.padding());
    let width = content_rect.width() * 0.85;
    let text_style = style.headline(SlideLayout::Statement);

    let galley = text::layout_markup(ui, headline, &text_style, width, egui::Align::Center);
    let height = galley.rect.height();
    let pos = Pos2::new(content_rect.center().x, content_rect.center().y - height / 2.0);
    let region = text::galley_rect(&galley, pos, width, egui::Align::Center);
    if !hide_text {
        ui.painter().galley(pos, galley, text_style.color);
    }

    SlideRegions {
        headline: Some(region),
        body: None,
    }
}
