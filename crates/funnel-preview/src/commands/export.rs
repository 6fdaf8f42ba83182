use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use eframe::egui;

use crate::config::Config;
use crate::fonts::FontSettings;
use crate::model::{Id, PreviewPayload};
use crate::render;
use crate::render::image_cache::ImageCache;
use crate::theme::{THEME_NAMES, Theme};

pub struct ExportOptions {
    pub presentation: String,
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub theme: Option<String>,
    pub server: Option<String>,
}

struct ExportApp {
    data: PreviewPayload,
    theme: Theme,
    fonts: FontSettings,
    image_cache: ImageCache,
    /// Downloaded images, turned into textures on the first frame.
    /// `None` marks an image that could not be fetched.
    image_bytes: HashMap<String, Option<Vec<u8>>>,
    output_dir: PathBuf,
    current_slide: usize,
    screenshot_requested: bool,
    done: bool,
}

impl ExportApp {
    fn slide_count(&self) -> usize {
        self.data.slide_count()
    }
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.done {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        for (url, bytes) in self.image_bytes.drain() {
            match bytes {
                Some(bytes) => self.image_cache.insert_bytes(ctx, &url, &bytes),
                None => self.image_cache.mark_failed(&url),
            }
        }

        // Check for screenshot result from previous frame
        let mut got_screenshot = false;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    let filename = format!("slide-{:02}.png", self.current_slide + 1);
                    let path = self.output_dir.join(&filename);
                    match save_color_image(image, &path) {
                        Ok(()) => eprintln!("  Saved {filename}"),
                        Err(e) => eprintln!("  {}", format!("Failed to save {filename}: {e:#}").red()),
                    }
                    got_screenshot = true;
                }
            }
        });

        if got_screenshot {
            self.screenshot_requested = false;
            self.current_slide += 1;
            if self.current_slide >= self.slide_count() {
                self.done = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                if let Some(slide) = self.data.slide_at(self.current_slide) {
                    render::render_slide(
                        ui,
                        slide,
                        &self.theme,
                        &self.fonts,
                        rect,
                        render::compute_scale(rect),
                        &self.image_cache,
                        None,
                    );
                }
            });

        // Request screenshot after rendering (will arrive next frame)
        if !self.screenshot_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }

        ctx.request_repaint();
    }
}

fn save_color_image(image: &egui::ColorImage, path: &Path) -> Result<()> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let pixels: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
        .collect();

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn run(options: ExportOptions) -> Result<()> {
    if let Some(theme) = options.theme.as_deref().filter(|t| !Theme::is_known(t)) {
        anyhow::bail!(
            "Unknown theme: {theme}. Must be one of: {}.",
            THEME_NAMES.join(", ")
        );
    }

    let config = Config::load_or_default();
    let client = super::client(&config, options.server.as_deref());
    let id = Id::from(options.presentation.as_str());
    let data = client
        .fetch_preview(&id)
        .with_context(|| format!("Failed to load presentation {id}"))?;

    if data.slide_count() == 0 {
        anyhow::bail!("Presentation {id} has no slides");
    }

    // Export renders synchronously, so images are fetched up front.
    let mut image_bytes = HashMap::new();
    for url in data.slides().filter_map(|s| s.image()) {
        if image_bytes.contains_key(url) {
            continue;
        }
        let bytes = match client.fetch_bytes(url) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                eprintln!("  {}", format!("Image {url} unavailable: {e}").yellow());
                None
            }
        };
        image_bytes.insert(url.to_string(), bytes);
    }

    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!("Failed to create {}", options.output_dir.display())
    })?;

    eprintln!(
        "Exporting {} slides to {} ({}x{})",
        data.slide_count(),
        options.output_dir.display(),
        options.width,
        options.height,
    );

    let theme_name = options
        .theme
        .as_deref()
        .or(data.presentation.theme.as_deref())
        .or(config.default_theme());
    let theme = Theme::resolve(theme_name);
    let fonts = data.presentation.font_settings.clone().unwrap_or_default();
    let title = format!("{} export", data.presentation.name);

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([options.width as f32, options.height as f32])
        .with_title(&title)
        .with_decorations(false);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let output_dir = options.output_dir.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(ExportApp {
                data,
                theme,
                fonts,
                image_cache: ImageCache::new(),
                image_bytes,
                output_dir,
                current_slide: 0,
                screenshot_requested: false,
                done: false,
            }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    eprintln!("{}", "Export complete.".green());
    Ok(())
}
