use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;
use crate::model::{Id, PreviewPayload, Slide};
use crate::playback::classify_mode;
use crate::render::markup;

const PREVIEW_CHARS: usize = 60;

pub fn run(presentation: &str, server: Option<&str>) -> Result<()> {
    let config = Config::load_or_default();
    let client = super::client(&config, server);
    let id = Id::from(presentation);
    let data = client
        .fetch_preview(&id)
        .with_context(|| format!("Failed to load presentation {id}"))?;
    print_outline(&data);
    Ok(())
}

fn print_outline(data: &PreviewPayload) {
    let flags = data.flags();
    println!(
        "{} {}",
        data.presentation.name.bold(),
        format!("#{}", data.presentation.id).dimmed()
    );
    println!(
        "  theme: {}  mode: {}  presenter: {}",
        data.presentation.theme.as_deref().unwrap_or("dark"),
        classify_mode(data, false).label().cyan(),
        classify_mode(data, true).label().cyan()
    );
    println!(
        "  audio: {}  synced: {}  script notes: {}",
        flags.has_audio, flags.has_synced_timestamps, flags.has_script_notes
    );

    if data.slide_count() == 0 {
        println!();
        println!("{}", "No slides.".yellow());
        return;
    }

    let mut number = 0;
    for entry in &data.timeline {
        println!();
        let name = entry
            .module
            .name
            .clone()
            .unwrap_or_else(|| format!("Module {}", entry.module.id));
        let media = match &entry.variant {
            Some(v) if v.is_audio_backed() => format!("{} ({})", v.media_type, "audio".green()),
            Some(v) if !v.media_type.is_empty() => v.media_type.clone(),
            _ => "no variant".to_string(),
        };
        println!("{} {}", name.bold(), format!("[{media}]").dimmed());

        for slide in &entry.slides {
            number += 1;
            println!("  {}", slide_line(number, slide));
        }
    }
}

fn slide_line(number: usize, slide: &Slide) -> String {
    let layout = slide.layout().map_or("empty", |l| l.name());
    let time = if slide.start_time_ms > 0 {
        format!("{:>6.1}s", slide.start_time_ms as f64 / 1000.0)
    } else {
        "      -".to_string()
    };
    let text = slide
        .headline_text()
        .or(slide.body_text())
        .map(preview)
        .unwrap_or_default();
    let notes = if slide.script_text().is_some() { " ✎" } else { "" };
    format!("{number:>3}. {time}  {layout:<9}  {text}{notes}")
}

/// First line of a text field with markup stripped, truncated for display.
fn preview(source: &str) -> String {
    let plain = markup::plain_text(&markup::parse(source));
    let first = plain.lines().next().unwrap_or_default().trim();
    if first.chars().count() > PREVIEW_CHARS {
        let cut: String = first.chars().take(PREVIEW_CHARS - 1).collect();
        format!("{cut}…")
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{slide, timed};

    #[test]
    fn test_preview_strips_markup_and_truncates() {
        assert_eq!(preview("**Big** idea\nsecond line"), "Big idea");
        let long = "x".repeat(100);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn test_slide_line_shows_layout_and_time() {
        colored::control::set_override(false);
        let line = slide_line(3, &slide(1, Some("Welcome"), None));
        assert!(line.contains("statement"));
        assert!(line.contains("Welcome"));

        let mut s = timed(2, 2500);
        s.headline = None;
        s.body = Some("Body".into());
        let line = slide_line(4, &s);
        assert!(line.contains("2.5s"));
        assert!(line.contains("narrative"));
    }
}
