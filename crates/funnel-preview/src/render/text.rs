use eframe::egui::{self, Color32, FontFamily, FontId, Pos2, Stroke};

use crate::render::markup::{self, Fragment};
use crate::theme::Theme;

/// Font and colors for one block of slide text.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f32,
    pub family: FontFamily,
    pub color: Color32,
    pub accent: Color32,
    pub uppercase: bool,
}

impl TextStyle {
    fn format(&self, color: Color32) -> egui::text::TextFormat {
        egui::text::TextFormat {
            font_id: FontId::new(self.size, self.family.clone()),
            color,
            ..Default::default()
        }
    }
}

/// Create a LayoutJob from markup fragments.
pub fn fragments_to_job(
    fragments: &[Fragment],
    style: &TextStyle,
    max_width: f32,
    halign: egui::Align,
) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width;
    job.halign = halign;

    for fragment in fragments {
        let text = if style.uppercase {
            fragment.text().to_uppercase()
        } else {
            fragment.text().to_string()
        };
        match fragment {
            Fragment::Text(_) => job.append(&text, 0.0, style.format(style.color)),
            Fragment::Accent(_) => {
                let mut format = style.format(style.accent);
                format.font_id.size = style.size + 2.0;
                job.append(&text, 0.0, format);
            }
            Fragment::Underline(_) => {
                let mut format = style.format(style.color);
                format.underline = Stroke::new((style.size / 14.0).max(2.0), style.color);
                job.append(&text, 0.0, format);
            }
            Fragment::Highlight(_) => {
                let mut format = style.format(style.color);
                format.background = Theme::with_opacity(style.accent, 0.35);
                job.append(&text, 0.0, format);
            }
            Fragment::LineBreak => job.append("\n", 0.0, style.format(style.color)),
        }
    }
    job
}

/// Lay out without painting, for measuring before vertical centering.
pub fn layout_markup(
    ui: &egui::Ui,
    source: &str,
    style: &TextStyle,
    max_width: f32,
    halign: egui::Align,
) -> std::sync::Arc<egui::Galley> {
    let fragments = markup::parse(source);
    let job = fragments_to_job(&fragments, style, max_width, halign);
    ui.painter().layout_job(job)
}

/// Screen rect covered by a galley painted at `pos`. Centered galleys are laid
/// out around `pos.x`, so the rect is shifted back to cover the text.
pub fn galley_rect(
    galley: &egui::Galley,
    pos: Pos2,
    max_width: f32,
    halign: egui::Align,
) -> egui::Rect {
    let size = galley.rect.size();
    let left = match halign {
        egui::Align::Center => pos.x - max_width / 2.0,
        _ => pos.x,
    };
    egui::Rect::from_min_size(Pos2::new(left, pos.y), egui::vec2(max_width, size.y))
}
