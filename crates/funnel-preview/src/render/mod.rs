pub mod image_cache;
pub mod layouts;
pub mod markup;
pub mod text;

use eframe::egui::{self, Align2, FontId, Pos2};

use crate::fonts::FontSettings;
use crate::model::{Slide, SlideField, SlideLayout};
use crate::theme::Theme;

use image_cache::{ImageCache, ImageLookup};
use layouts::{SlideRegions, SlideStyle};

/// Reference canvas size; every layout measurement is in these units.
pub const REFERENCE_SIZE: egui::Vec2 = egui::vec2(1920.0, 1080.0);

pub fn compute_scale(rect: egui::Rect) -> f32 {
    (rect.width() / REFERENCE_SIZE.x).min(rect.height() / REFERENCE_SIZE.y)
}

/// Largest 16:9 rect centered in `available`.
pub fn slide_rect(available: egui::Rect) -> egui::Rect {
    let scale = compute_scale(available);
    egui::Rect::from_center_size(available.center(), REFERENCE_SIZE * scale)
}

/// Render a single slide using the layout derived from its content.
/// `hidden` suppresses painting of a field that is being edited in place.
#[allow(clippy::too_many_arguments)]
pub fn render_slide(
    ui: &egui::Ui,
    slide: &Slide,
    theme: &Theme,
    fonts: &FontSettings,
    rect: egui::Rect,
    scale: f32,
    images: &ImageCache,
    hidden: Option<SlideField>,
) -> SlideRegions {
    ui.painter().rect_filled(rect, 0.0, theme.background);
    let style = SlideStyle {
        theme,
        fonts,
        scale,
    };

    let text_rect = match slide.image() {
        Some(url) => {
            let (text_rect, image_rect) = split_for_image(rect, scale);
            draw_image(ui, url, theme, image_rect, scale, images);
            text_rect
        }
        None => rect,
    };

    match (slide.layout(), slide.headline_text(), slide.body_text()) {
        (Some(SlideLayout::Statement), Some(headline), _) => layouts::statement::render(
            ui,
            headline,
            &style,
            text_rect,
            hidden == Some(SlideField::Headline),
        ),
        (Some(SlideLayout::Narrative), _, Some(body)) => layouts::narrative::render(
            ui,
            body,
            &style,
            text_rect,
            hidden == Some(SlideField::Body),
        ),
        (Some(SlideLayout::Standard), Some(headline), Some(body)) => {
            layouts::standard::render(ui, headline, body, &style, text_rect, hidden)
        }
        _ => {
            if slide.image().is_none() {
                draw_empty_placeholder(ui, theme, rect, scale);
            }
            SlideRegions::default()
        }
    }
}

/// Text takes the left part of the canvas, the image the right.
fn split_for_image(rect: egui::Rect, scale: f32) -> (egui::Rect, egui::Rect) {
    let split = rect.left() + rect.width() * 0.56;
    let text_rect = egui::Rect::from_min_max(rect.min, Pos2::new(split, rect.bottom()));
    let image_rect = egui::Rect::from_min_max(Pos2::new(split, rect.top()), rect.max)
        .shrink(72.0 * scale);
    (text_rect, image_rect)
}

fn draw_image(
    ui: &egui::Ui,
    url: &str,
    theme: &Theme,
    area: egui::Rect,
    scale: f32,
    images: &ImageCache,
) {
    match images.lookup(url) {
        ImageLookup::Ready(texture) => {
            let draw_rect = image_cache::fit_rect(texture.size_vec2(), area);
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter()
                .image(texture.id(), draw_rect, uv, egui::Color32::WHITE);
        }
        ImageLookup::Loading => {
            draw_image_placeholder(ui, theme, area, scale, "Loading image…");
        }
        ImageLookup::Failed => {
            draw_image_placeholder(ui, theme, area, scale, "Image unavailable");
        }
    }
}

fn draw_image_placeholder(
    ui: &egui::Ui,
    theme: &Theme,
    area: egui::Rect,
    scale: f32,
    label: &str,
) {
    ui.painter().rect_filled(area, 12.0 * scale, theme.surface);
    ui.painter().text(
        area.center(),
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(28.0 * scale),
        theme.muted,
    );
}

fn draw_empty_placeholder(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, scale: f32) {
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Empty slide",
        FontId::proportional(40.0 * scale),
        theme.muted,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::slide;

    fn regions_for(slide: &Slide) -> SlideRegions {
        let ctx = egui::Context::default();
        let images = ImageCache::new();
        let mut regions = SlideRegions::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let rect = egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(960.0, 540.0));
                regions = render_slide(
                    ui,
                    slide,
                    &Theme::dark(),
                    &FontSettings::default(),
                    rect,
                    compute_scale(rect),
                    &images,
                    None,
                );
            });
        });
        regions
    }

    #[test]
    fn test_regions_follow_layout() {
        let statement = regions_for(&slide(1, Some("Welcome"), None));
        assert!(statement.headline.is_some());
        assert!(statement.body.is_none());

        let narrative = regions_for(&slide(2, None, Some("Thanks for joining")));
        assert!(narrative.headline.is_none());
        assert!(narrative.body.is_some());

        let standard = regions_for(&slide(3, Some("Title"), Some("Body")));
        let (h, b) = (standard.headline.unwrap(), standard.body.unwrap());
        assert!(h.bottom() <= b.top());
    }

    #[test]
    fn test_empty_slide_has_no_regions() {
        assert_eq!(regions_for(&slide(4, None, Some("  "))), SlideRegions::default());
    }

    #[test]
    fn test_slide_rect_is_16_by_9() {
        let available = egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(1000.0, 1000.0));
        let rect = slide_rect(available);
        assert!((rect.width() / rect.height() - 16.0 / 9.0).abs() < 1e-3);
        assert_eq!(rect.center(), available.center());
    }
}
