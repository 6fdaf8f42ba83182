use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::api::{FunnelClient, PresentationUpdate};
use crate::editor::SlideEdit;
use crate::error::{ApiError, ApiResult};
use crate::fonts::FontSettings;
use crate::model::{Id, PreviewPayload};
use crate::transform::TransformRequest;

/// A local change that must be persisted to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Theme(String),
    Fonts(FontSettings),
    Slide(SlideEdit),
}

impl Mutation {
    pub fn describe(&self) -> String {
        match self {
            Mutation::Theme(name) => format!("theme \"{name}\""),
            Mutation::Fonts(_) => "font settings".to_string(),
            Mutation::Slide(edit) => format!("slide {} {}", edit.slide_id, edit.field.key()),
        }
    }
}

/// Completion of a background request, delivered to the UI thread.
#[derive(Debug)]
pub enum SyncEvent {
    PreviewLoaded(ApiResult<PreviewPayload>),
    Saved {
        mutation: Mutation,
        result: ApiResult<()>,
    },
    TransformFinished {
        request: TransformRequest,
        result: ApiResult<PreviewPayload>,
    },
    AudioFetched {
        module: usize,
        result: ApiResult<Vec<u8>>,
    },
    ImageFetched {
        url: String,
        result: ApiResult<Vec<u8>>,
    },
}

/// Runs blocking API calls off the UI thread and reports each outcome as a
/// [`SyncEvent`]. Nothing is cancelled or coalesced; completions are applied
/// in arrival order.
pub struct SyncWorker {
    runtime: Runtime,
    client: Arc<FunnelClient>,
    presentation: Id,
    tx: UnboundedSender<SyncEvent>,
    rx: UnboundedReceiver<SyncEvent>,
    repaint: Option<egui::Context>,
}

impl SyncWorker {
    pub fn new(client: FunnelClient, presentation: Id) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("funnel-sync")
            .enable_all()
            .build()
            .context("Failed to start background runtime")?;
        let (tx, rx) = unbounded_channel();
        Ok(Self {
            runtime,
            client: Arc::new(client),
            presentation,
            tx,
            rx,
            repaint: None,
        })
    }

    /// Wake the UI whenever an event is delivered.
    pub fn set_repaint(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    pub fn client(&self) -> &FunnelClient {
        &self.client
    }

    pub fn presentation(&self) -> &Id {
        &self.presentation
    }

    /// Drain every event that has arrived since the last frame.
    pub fn poll(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn load_preview(&self) {
        let id = self.presentation.clone();
        self.run(move |client| SyncEvent::PreviewLoaded(client.fetch_preview(&id)));
    }

    pub fn persist(&self, mutation: Mutation) {
        let id = self.presentation.clone();
        self.run(move |client| {
            let result = match &mutation {
                Mutation::Theme(theme) => client.update_presentation(
                    &id,
                    &PresentationUpdate::Theme {
                        theme: theme.clone(),
                    },
                ),
                Mutation::Fonts(fonts) => client.update_presentation(
                    &id,
                    &PresentationUpdate::Fonts {
                        font_settings: fonts.clone(),
                    },
                ),
                Mutation::Slide(edit) => client.update_slide(edit),
            };
            SyncEvent::Saved { mutation, result }
        });
    }

    /// POST the rewrite, then re-fetch the full preview on success.
    pub fn transform(&self, request: TransformRequest) {
        let id = self.presentation.clone();
        self.run(move |client| {
            let result = client
                .apply_transform(&id, request.style, request.limit)
                .and_then(|()| client.fetch_preview(&id));
            SyncEvent::TransformFinished { request, result }
        });
    }

    pub fn fetch_audio(&self, module: usize, url: String) {
        self.run(move |client| SyncEvent::AudioFetched {
            module,
            result: client.fetch_bytes(&url),
        });
    }

    pub fn fetch_image(&self, url: String) {
        self.run(move |client| {
            let result = client.fetch_bytes(&url);
            SyncEvent::ImageFetched { url, result }
        });
    }

    fn run<F>(&self, job: F)
    where
        F: FnOnce(&FunnelClient) -> SyncEvent + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        self.runtime.spawn_blocking(move || {
            let event = job(&client);
            if let Some(err) = event_error(&event) {
                tracing::warn!("Background request failed: {err}");
            }
            if tx.send(event).is_err() {
                tracing::debug!("UI closed before background request finished");
                return;
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}

fn event_error(event: &SyncEvent) -> Option<&ApiError> {
    match event {
        SyncEvent::PreviewLoaded(Err(e))
        | SyncEvent::Saved { result: Err(e), .. }
        | SyncEvent::TransformFinished { result: Err(e), .. }
        | SyncEvent::AudioFetched { result: Err(e), .. }
        | SyncEvent::ImageFetched { result: Err(e), .. } => Some(e),
        _ => None,
    }
}
