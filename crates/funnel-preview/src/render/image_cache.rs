use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{Context, Result};
use eframe::egui;

enum ImageState {
    Pending,
    Ready(egui::TextureHandle),
    Failed,
}

/// Slide images by URL. Rendering only reads the cache; misses are queued and
/// the app fetches them in the background, then hands the bytes back.
#[derive(Default)]
pub struct ImageCache {
    images: RefCell<HashMap<String, ImageState>>,
    requests: RefCell<Vec<String>>,
}

/// What the renderer should draw for an image URL.
pub enum ImageLookup {
    Ready(egui::TextureHandle),
    Loading,
    Failed,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, url: &str) -> ImageLookup {
        let mut images = self.images.borrow_mut();
        match images.get(url) {
            Some(ImageState::Ready(texture)) => ImageLookup::Ready(texture.clone()),
            Some(ImageState::Failed) => ImageLookup::Failed,
            Some(ImageState::Pending) => ImageLookup::Loading,
            None => {
                images.insert(url.to_string(), ImageState::Pending);
                self.requests.borrow_mut().push(url.to_string());
                ImageLookup::Loading
            }
        }
    }

    /// URLs first seen since the last call.
    pub fn take_requests(&self) -> Vec<String> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    pub fn insert_bytes(&self, ctx: &egui::Context, url: &str, bytes: &[u8]) {
        let state = match decode(bytes) {
            Ok(color_image) => {
                let texture = ctx.load_texture(url, color_image, egui::TextureOptions::LINEAR);
                ImageState::Ready(texture)
            }
            Err(e) => {
                tracing::warn!("Failed to decode image {url}: {e:#}");
                ImageState::Failed
            }
        };
        self.images.borrow_mut().insert(url.to_string(), state);
    }

    pub fn mark_failed(&self, url: &str) {
        self.images
            .borrow_mut()
            .insert(url.to_string(), ImageState::Failed);
    }

    pub fn clear(&self) {
        self.images.borrow_mut().clear();
        self.requests.borrow_mut().clear();
    }
}

fn decode(bytes: &[u8]) -> Result<egui::ColorImage> {
    let image = image::load_from_memory(bytes).context("Unsupported image data")?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_flat_samples().as_slice(),
    ))
}

/// Largest rect with the texture's aspect ratio that fits `available`, centered.
pub fn fit_rect(tex_size: egui::Vec2, available: egui::Rect) -> egui::Rect {
    if tex_size.x <= 0.0 || tex_size.y <= 0.0 {
        return available;
    }
    let scale = (available.width() / tex_size.x).min(available.height() / tex_size.y);
    egui::Rect::from_center_size(available.center(), tex_size * scale)
}
