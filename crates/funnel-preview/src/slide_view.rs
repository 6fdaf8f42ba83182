use eframe::egui::{self, FontId, Key, Sense, Stroke};

use crate::editor::{InlineEditor, SlideEdit};
use crate::fonts::{self, FontSettings};
use crate::model::{Slide, SlideField, SlideLayout};
use crate::render::{self, image_cache::ImageCache, layouts::SlideRegions};
use crate::theme::Theme;

/// Slide on screen plus click-to-edit for its headline and body.
pub struct SlideView<'a> {
    pub theme: &'a Theme,
    pub fonts: &'a FontSettings,
    pub images: &'a ImageCache,
    pub editable: bool,
}

impl SlideView<'_> {
    /// Draw `slide` into `rect`. Returns a committed edit, if any.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        slide: &Slide,
        rect: egui::Rect,
        editor: &mut InlineEditor,
    ) -> Option<SlideEdit> {
        editor.sync_slide(Some(&slide.id));
        if !self.editable {
            editor.cancel();
        }
        let scale = render::compute_scale(rect);
        let regions = render::render_slide(
            ui,
            slide,
            self.theme,
            self.fonts,
            rect,
            scale,
            self.images,
            editor.editing(),
        );
        if !self.editable {
            return None;
        }

        let mut committed = None;
        for (field, region) in field_regions(&regions) {
            if editor.editing() == Some(field) {
                committed = self.edit_field(ui, slide, field, region, scale, editor);
            } else if editor.editing().is_none() {
                let id = ui.id().with(("slide-field", slide.id.to_string(), field.key()));
                let response = ui
                    .interact(region, id, Sense::click())
                    .on_hover_cursor(egui::CursorIcon::Text);
                if response.hovered() {
                    let outline = Theme::with_opacity(self.fonts.accent(), 0.5);
                    ui.painter().rect_stroke(
                        region.expand(8.0 * scale),
                        6.0 * scale,
                        Stroke::new(1.5, outline),
                        egui::StrokeKind::Outside,
                    );
                }
                if response.clicked() {
                    editor.begin(slide, field);
                }
            }
        }
        committed
    }

    fn edit_field(
        &self,
        ui: &mut egui::Ui,
        slide: &Slide,
        field: SlideField,
        region: egui::Rect,
        scale: f32,
        editor: &mut InlineEditor,
    ) -> Option<SlideEdit> {
        let layout = slide.layout().unwrap_or(SlideLayout::Standard);
        let (size, family, color) = match field {
            SlideField::Headline => (
                self.fonts.headline_size.headline_px(layout),
                &self.fonts.headline_font,
                self.fonts.headline_color(self.theme),
            ),
            SlideField::Body => (
                self.fonts.body_size.body_px(layout),
                &self.fonts.body_font,
                self.fonts.body_color(self.theme),
            ),
        };
        let session = editor.session_mut()?;
        let edit = egui::TextEdit::multiline(&mut session.buffer)
            .font(FontId::new(size * scale, fonts::egui_family(family)))
            .text_color(color)
            .desired_width(region.width())
            .desired_rows(1);
        let response = ui.put(region.expand(8.0 * scale), edit);
        if session.needs_focus {
            response.request_focus();
            session.needs_focus = false;
            return None;
        }

        let (escape, submit) = ui.input(|i| {
            (
                i.key_pressed(Key::Escape),
                i.modifiers.command && i.key_pressed(Key::Enter),
            )
        });
        if escape {
            editor.cancel();
            None
        } else if submit || response.lost_focus() {
            editor.commit()
        } else {
            None
        }
    }
}

fn field_regions(regions: &SlideRegions) -> impl Iterator<Item = (SlideField, egui::Rect)> {
    [
        (SlideField::Headline, regions.headline),
        (SlideField::Body, regions.body),
    ]
    .into_iter()
    .filter_map(|(field, rect)| rect.map(|r| (field, r)))
}
