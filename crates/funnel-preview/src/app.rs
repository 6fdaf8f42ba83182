use std::time::Instant;

use anyhow::Context as _;
use eframe::egui;

use crate::commands;
use crate::config::Config;
use crate::editor::InlineEditor;
use crate::fonts::{FONT_FAMILIES, FontSettings, FontWeight, SizeStep};
use crate::model::Id;
use crate::playback::audio_sync::{AudioCue, AudioPhase};
use crate::playback::player::AudioPlayer;
use crate::playback::poll::{POLL_INTERVAL, PollTask};
use crate::playback::{Controller, Mode, NavKey};
use crate::render;
use crate::render::image_cache::ImageCache;
use crate::session::{Session, View};
use crate::slide_view::SlideView;
use crate::sync::{Mutation, SyncEvent, SyncWorker};
use crate::theme::{self, THEME_NAMES, Theme};
use crate::transform::{SlideLimit, TransformStyle};

const TOAST_SECONDS: f32 = 4.0;
const TOAST_FADE_SECONDS: f32 = 1.0;

pub struct LaunchOptions {
    pub presentation: String,
    pub server: Option<String>,
    pub presenter: bool,
    pub windowed: bool,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let fade_start = TOAST_SECONDS - TOAST_FADE_SECONDS;
        if elapsed < fade_start {
            1.0
        } else if elapsed < TOAST_SECONDS {
            1.0 - (elapsed - fade_start) / TOAST_FADE_SECONDS
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_SECONDS
    }
}

/// Audio output and the task polling its playhead. Both exist only while an
/// audio-synced session is loading or playing.
#[derive(Default)]
struct AudioOutput {
    player: Option<AudioPlayer>,
    poll: Option<PollTask>,
}

impl AudioOutput {
    fn stop(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel();
        }
        if let Some(player) = &mut self.player {
            player.stop();
        }
    }

    fn player(&mut self) -> anyhow::Result<&mut AudioPlayer> {
        if self.player.is_none() {
            self.player = Some(AudioPlayer::open()?);
        }
        self.player
            .as_mut()
            .context("Audio output unavailable")
    }
}

struct PreviewApp {
    session: Session,
    worker: SyncWorker,
    editor: InlineEditor,
    images: ImageCache,
    audio: AudioOutput,
    toast: Option<Toast>,
    ctx: egui::Context,
}

impl PreviewApp {
    fn new(ctx: egui::Context, mut worker: SyncWorker, session: Session) -> Self {
        worker.set_repaint(ctx.clone());
        worker.load_preview();
        Self {
            session,
            worker,
            editor: InlineEditor::default(),
            images: ImageCache::new(),
            audio: AudioOutput::default(),
            toast: None,
            ctx,
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message.into()));
    }

    fn persist(&mut self, mutation: Option<Mutation>) {
        if let Some(mutation) = mutation {
            tracing::debug!("Saving {}", mutation.describe());
            self.worker.persist(mutation);
        }
    }

    fn reload(&mut self) {
        self.audio.stop();
        self.images.clear();
        self.session.begin_reload();
        self.worker.load_preview();
    }

    fn retry_failed_saves(&mut self) {
        let failed = self.session.take_failed_saves();
        tracing::info!("Retrying {} failed save(s)", failed.len());
        for mutation in failed {
            self.worker.persist(mutation);
        }
    }

    fn load_audio(&mut self, cue: Option<AudioCue>) {
        if let Some(cue) = cue {
            tracing::info!("Loading audio for module {}", cue.module + 1);
            self.worker.fetch_audio(cue.module, cue.url);
        }
    }

    // --- background completions -------------------------------------------

    fn process_events(&mut self) {
        for event in self.worker.poll() {
            match event {
                SyncEvent::PreviewLoaded(Ok(payload)) => self.session.on_loaded(payload),
                SyncEvent::PreviewLoaded(Err(e)) => {
                    if e.http_status() == Some(401) {
                        tracing::warn!("Not signed in; run `funnel-preview config init` to set a session cookie");
                    }
                    self.session.on_load_failed(&e.to_string());
                }
                SyncEvent::Saved { mutation, result } => {
                    if let Some(message) = self.session.on_saved(mutation, result) {
                        self.notify(message);
                    }
                }
                SyncEvent::TransformFinished { request, result } => {
                    let ok = result.is_ok();
                    self.session.on_transform_finished(request, result);
                    if ok {
                        self.notify(format!("{} rewrite applied", request.style.label()));
                    }
                }
                SyncEvent::AudioFetched { module, result } => self.on_audio_fetched(module, result),
                SyncEvent::ImageFetched { url, result } => match result {
                    Ok(bytes) => self.images.insert_bytes(&self.ctx, &url, &bytes),
                    Err(_) => self.images.mark_failed(&url),
                },
            }
        }
    }

    fn on_audio_fetched(&mut self, module: usize, result: crate::error::ApiResult<Vec<u8>>) {
        if self.session.audio_phase() != Some(&AudioPhase::Loading) {
            tracing::debug!("Dropping stale audio for module {}", module + 1);
            return;
        }
        let started = result
            .map_err(anyhow::Error::from)
            .and_then(|bytes| self.audio.player()?.play(bytes));
        match started {
            Ok(sink) => {
                if self.session.audio_ready(module) {
                    self.audio.poll = Some(PollTask::spawn(
                        &self.worker.handle(),
                        POLL_INTERVAL,
                        sink,
                        Some(self.ctx.clone()),
                    ));
                } else {
                    self.audio.stop();
                }
            }
            Err(e) => {
                tracing::warn!("Audio for module {} failed: {e:#}", module + 1);
                self.session.audio_failed(module, format!("{e:#}"));
            }
        }
    }

    /// Feed playhead ticks into the session and keep audio output in step
    /// with the audio phase.
    fn drive_audio(&mut self) {
        let tick = self.audio.poll.as_mut().and_then(PollTask::latest);
        if let Some(tick) = tick {
            self.session.audio_tick(tick.position);
            if tick.finished {
                self.audio.stop();
                let cue = self.session.audio_ended();
                self.load_audio(cue);
            }
        }
        let active = matches!(
            self.session.audio_phase(),
            Some(AudioPhase::Playing | AudioPhase::Loading)
        );
        if !active {
            self.audio.stop();
        }
    }

    // --- input -------------------------------------------------------------

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || self.session.modal_open() {
            return;
        }
        let mut viewport_cmds = Vec::new();
        let mut keys = Vec::new();
        let mut toggle_presenter = false;
        let mut cycle_theme = false;
        ctx.input(|i| {
            keys.extend(
                NavKey::ALL
                    .into_iter()
                    .filter(|key| i.key_pressed(key.egui_key())),
            );
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
            }
            if i.key_pressed(egui::Key::P) {
                toggle_presenter = true;
            }
            if i.key_pressed(egui::Key::T) {
                cycle_theme = true;
            }
        });
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if toggle_presenter {
            self.toggle_presenter();
        }
        if cycle_theme {
            let next = self.session.theme().next();
            let mutation = self.session.set_theme(&next.name);
            self.persist(mutation);
        }
        for key in keys {
            let cue = self.session.on_key(key);
            self.load_audio(cue);
        }
    }

    fn toggle_presenter(&mut self) {
        let has_notes = self
            .session
            .data()
            .is_some_and(|d| d.flags().has_script_notes);
        if !has_notes {
            self.notify("No script notes in this presentation");
            return;
        }
        if self.session.toggle_presenter() {
            self.editor.cancel();
        }
    }

    // --- panels ------------------------------------------------------------

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                let name = self
                    .session
                    .data()
                    .map(|d| d.presentation.name.clone())
                    .unwrap_or_else(|| "Loading…".to_string());
                ui.strong(name);
                ui.separator();

                let mut theme = self.session.theme().name.clone();
                egui::ComboBox::from_id_salt("theme")
                    .selected_text(self.session.theme().label)
                    .show_ui(ui, |ui| {
                        for name in THEME_NAMES {
                            let label = Theme::from_name(name).map_or(name, |t| t.label);
                            ui.selectable_value(&mut theme, name.to_string(), label);
                        }
                    });
                if theme != self.session.theme().name {
                    let mutation = self.session.set_theme(&theme);
                    self.persist(mutation);
                }

                let panel = self.session.font_panel_mut();
                let label = if panel.is_dirty() { "Fonts •" } else { "Fonts" };
                if ui.selectable_label(panel.open, label).clicked() {
                    panel.open = !panel.open;
                }

                let has_notes = self
                    .session
                    .data()
                    .is_some_and(|d| d.flags().has_script_notes);
                let mut presenter = self.session.presenter();
                let toggle = ui
                    .add_enabled(has_notes, egui::Checkbox::new(&mut presenter, "Presenter"))
                    .on_disabled_hover_text("No slide has script notes");
                if toggle.changed() {
                    self.toggle_presenter();
                }
                ui.label(
                    egui::RichText::new(self.session.mode().label())
                        .small()
                        .weak(),
                );

                ui.separator();
                self.draw_transform_controls(ui);

                let failed = self.session.failed_saves().len();
                if failed > 0 {
                    ui.separator();
                    let text = format!("Retry failed saves ({failed})");
                    if ui
                        .button(egui::RichText::new(text).color(ui.visuals().warn_fg_color))
                        .clicked()
                    {
                        self.retry_failed_saves();
                    }
                }
            });
        });
    }

    fn draw_transform_controls(&mut self, ui: &mut egui::Ui) {
        let deck_loaded = matches!(self.session.view(), View::Deck | View::NoSlides);
        let gate = self.session.transform_gate_mut();
        let running = gate.running();
        let enabled = deck_loaded && running.is_none();

        ui.add_enabled_ui(enabled, |ui| {
            egui::ComboBox::from_id_salt("limit")
                .selected_text(gate.limit.label())
                .width(90.0)
                .show_ui(ui, |ui| {
                    for limit in SlideLimit::ALL {
                        ui.selectable_value(&mut gate.limit, limit, limit.label());
                    }
                });
        });
        for style in TransformStyle::ALL {
            let button = ui
                .add_enabled(enabled, egui::Button::new(style.label()))
                .on_hover_text(style.description());
            if button.clicked() {
                gate.request(style);
            }
        }
        if let Some(style) = running {
            ui.spinner();
            ui.label(format!("{}…", style.label()));
        }
    }

    fn draw_font_panel(&mut self, ctx: &egui::Context) {
        if !self.session.font_panel().open {
            return;
        }
        let theme = self.session.theme().clone();
        let mut draft = self.session.font_panel().fonts().clone();
        let mut action = None;

        egui::SidePanel::right("fonts")
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Typography");
                ui.add_space(8.0);
                egui::ScrollArea::vertical().show(ui, |ui| {
                    font_controls(ui, &mut draft, &theme);
                });
                ui.separator();
                let dirty = self.session.font_panel().is_dirty();
                ui.horizontal(|ui| {
                    if ui.add_enabled(dirty, egui::Button::new("Save")).clicked() {
                        action = Some(FontAction::Save);
                    }
                    if ui.add_enabled(dirty, egui::Button::new("Revert")).clicked() {
                        action = Some(FontAction::Revert);
                    }
                    if ui.button("Defaults").clicked() {
                        action = Some(FontAction::Defaults);
                    }
                    if ui.button("Close").clicked() {
                        action = Some(FontAction::Close);
                    }
                });
                if dirty {
                    ui.label(egui::RichText::new("Unsaved changes").small().weak());
                }
            });

        let panel = self.session.font_panel_mut();
        if &draft != panel.fonts() {
            panel.update(|fonts| *fonts = draft);
        }
        match action {
            Some(FontAction::Save) => {
                let mutation = self.session.save_fonts();
                self.persist(Some(mutation));
            }
            Some(FontAction::Revert) => self.session.font_panel_mut().revert(),
            Some(FontAction::Defaults) => self.session.font_panel_mut().reset_to_defaults(),
            Some(FontAction::Close) => self.session.font_panel_mut().open = false,
            None => {}
        }
    }

    fn draw_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(style) = self.session.transform_gate().pending() {
            let limit = self.session.transform_gate().limit;
            let mut choice = None;
            let modal = egui::Modal::new(egui::Id::new("transform-confirm")).show(ctx, |ui| {
                ui.set_width(420.0);
                ui.heading(format!("Apply {}?", style.label()));
                ui.add_space(6.0);
                ui.label(style.description());
                ui.add_space(6.0);
                let scope = match limit.count() {
                    Some(n) => format!("Up to {n} slides will be rewritten on the server."),
                    None => "Every slide will be rewritten on the server.".to_string(),
                };
                ui.label(scope);
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    "Existing headline and body text is replaced. This cannot be undone.",
                );
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Rewrite slides").clicked() {
                        choice = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        choice = Some(false);
                    }
                });
            });
            if choice.is_none() && modal.should_close() {
                choice = Some(false);
            }
            match choice {
                Some(true) => {
                    if let Some(request) = self.session.confirm_transform() {
                        tracing::info!(
                            "Requesting {} rewrite ({})",
                            request.style.label(),
                            request.limit.label()
                        );
                        self.editor.cancel();
                        self.worker.transform(request);
                    }
                }
                Some(false) => self.session.transform_gate_mut().cancel(),
                None => {}
            }
        }

        if let Some(message) = self.session.alert().map(String::from) {
            let mut dismissed = false;
            let modal = egui::Modal::new(egui::Id::new("transform-alert")).show(ctx, |ui| {
                ui.set_width(380.0);
                ui.heading("Rewrite failed");
                ui.add_space(6.0);
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
            if dismissed || modal.should_close() {
                self.session.dismiss_alert();
            }
        }
    }

    fn draw_script_panel(&mut self, ctx: &egui::Context) {
        if self.session.view() != &View::Deck || self.session.mode() != Mode::Teleprompter {
            return;
        }
        let scroll_to_active = self.session.take_scroll_request();
        let Some(data) = self.session.data() else {
            return;
        };
        let active = self.session.current_index();
        let mut clicked = None;
        let theme = self.session.theme().clone();
        let accent = self.session.font_panel().fonts().accent();

        egui::SidePanel::left("script")
            .resizable(true)
            .default_width(460.0)
            .show(ctx, |ui| {
                ui.heading("Script");
                ui.separator();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for (index, slide) in data.slides().enumerate() {
                            let is_active = index == active;
                            let fill = if is_active {
                                Theme::with_opacity(accent, 0.18)
                            } else {
                                egui::Color32::TRANSPARENT
                            };
                            let response = egui::Frame::new()
                                .fill(fill)
                                .inner_margin(10.0)
                                .corner_radius(6.0)
                                .show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    ui.horizontal(|ui| {
                                        ui.label(
                                            egui::RichText::new(format!("{}", index + 1))
                                                .strong()
                                                .color(if is_active { accent } else { theme.muted }),
                                        );
                                        if let Some(headline) = slide.headline_text() {
                                            ui.label(egui::RichText::new(headline).weak());
                                        }
                                    });
                                    let notes = slide.script_text().unwrap_or("(no script)");
                                    ui.label(egui::RichText::new(notes).size(20.0));
                                })
                                .response
                                .interact(egui::Sense::click());
                            if response.clicked() {
                                clicked = Some(index);
                            }
                            if is_active && scroll_to_active {
                                response.scroll_to_me(Some(egui::Align::Center));
                            }
                            ui.add_space(4.0);
                        }
                    });
            });

        if let Some(index) = clicked {
            self.session.go_to(index);
        }
    }

    // --- central -------------------------------------------------------------

    fn draw_central(&mut self, ctx: &egui::Context) {
        let bg = self.session.theme().background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                match self.session.view().clone() {
                    View::Loading => draw_loading(ui, rect),
                    View::Unavailable(message) => {
                        if draw_unavailable(ui, &message, &self.worker.client().admin_url()) {
                            self.reload();
                        }
                    }
                    View::NoSlides => draw_no_slides(ui, &self.worker.client().admin_url()),
                    View::Deck => self.draw_deck(ui, rect),
                }
                self.draw_toast(ui, rect);
            });
    }

    fn draw_deck(&mut self, ui: &mut egui::Ui, rect: egui::Rect) {
        let slide_rect = render::slide_rect(rect.shrink(16.0));
        let mode = self.session.mode();
        let view = SlideView {
            theme: self.session.theme(),
            fonts: self.session.font_panel().fonts(),
            images: &self.images,
            editable: mode == Mode::ClickThrough,
        };
        let edit = match self.session.current_slide() {
            Some(slide) => view.show(ui, slide, slide_rect, &mut self.editor),
            None => None,
        };
        if let Some(edit) = edit {
            let mutation = self.session.apply_edit(edit);
            self.persist(mutation);
        }

        let scale = render::compute_scale(slide_rect);
        match mode {
            Mode::ClickThrough => self.draw_click_footer(ui, slide_rect, scale),
            Mode::AudioSynced => self.draw_audio_overlay(ui, slide_rect, scale),
            Mode::Teleprompter => {}
        }
        draw_counter(
            ui,
            self.session.theme(),
            slide_rect,
            scale,
            self.session.current_index(),
            self.session.slide_count(),
        );
    }

    fn draw_click_footer(&mut self, ui: &mut egui::Ui, rect: egui::Rect, scale: f32) {
        let index = self.session.current_index();
        let len = self.session.slide_count();
        let size = egui::vec2(48.0, 48.0) * scale.max(0.5);
        let prev = egui::Rect::from_min_size(
            egui::pos2(rect.left() + 16.0, rect.center().y - size.y / 2.0),
            size,
        );
        let next = egui::Rect::from_min_size(
            egui::pos2(rect.right() - 16.0 - size.x, rect.center().y - size.y / 2.0),
            size,
        );
        if index > 0 && ui.put(prev, egui::Button::new("‹")).clicked() {
            self.session.on_key(NavKey::Left);
        }
        if index + 1 < len && ui.put(next, egui::Button::new("›")).clicked() {
            self.session.on_key(NavKey::Right);
        }
    }

    fn draw_audio_overlay(&mut self, ui: &mut egui::Ui, rect: egui::Rect, scale: f32) {
        let Some(phase) = self.session.audio_phase().cloned() else {
            return;
        };
        let overlay = egui::Rect::from_center_size(
            egui::pos2(rect.center().x, rect.bottom() - 90.0 * scale),
            egui::vec2(520.0 * scale.max(0.6), 90.0 * scale.max(0.6)),
        );
        let mut start = false;
        ui.scope_builder(egui::UiBuilder::new().max_rect(overlay), |ui| {
            ui.centered_and_justified(|ui| match &phase {
                AudioPhase::Idle => {
                    start = ui.button("▶ Start presentation").clicked();
                }
                AudioPhase::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading audio…");
                    });
                }
                AudioPhase::Playing => {}
                AudioPhase::Finished => {
                    start = ui.button("↺ Restart").clicked();
                }
                AudioPhase::Failed(message) => {
                    ui.vertical_centered(|ui| {
                        ui.colored_label(ui.visuals().error_fg_color, message.as_str());
                        start = ui.button("Try again").clicked();
                    });
                }
            });
        });
        if start {
            let cue = self.session.start_audio();
            self.load_audio(cue);
        }
        if phase == AudioPhase::Playing {
            if let Some(module) = match self.session.controller() {
                Controller::AudioSynced(sync) => Some(sync.module()),
                _ => None,
            } {
                let modules = self.session.data().map_or(0, |d| d.timeline.len());
                ui.painter().text(
                    egui::pos2(rect.left() + 24.0 * scale, rect.bottom() - 24.0 * scale),
                    egui::Align2::LEFT_BOTTOM,
                    format!("♪ Module {} / {modules}", module + 1),
                    egui::FontId::proportional(22.0 * scale),
                    self.session.theme().muted,
                );
            }
        }
    }

    fn draw_toast(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
        let Some(toast) = &self.toast else {
            return;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let theme = self.session.theme();
        let color = Theme::with_opacity(theme.foreground, opacity);
        let bg = Theme::with_opacity(theme.surface, opacity * 0.95);
        let galley = ui.painter().layout(
            toast.message.clone(),
            egui::FontId::proportional(16.0),
            color,
            rect.width() * 0.6,
        );
        let padding = 14.0;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - galley.rect.height() - padding * 2.0 - 24.0,
            ),
            galley.rect.size() + egui::vec2(padding * 2.0, padding * 2.0),
        );
        ui.painter().rect_filled(toast_rect, 8.0, bg);
        ui.painter().galley(
            toast_rect.min + egui::vec2(padding, padding),
            galley,
            color,
        );
        ui.ctx().request_repaint();
    }

    fn request_images(&mut self) {
        for url in self.images.take_requests() {
            self.worker.fetch_image(url);
        }
    }
}

enum FontAction {
    Save,
    Revert,
    Defaults,
    Close,
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_events();
        self.drive_audio();

        let visuals = if self.session.theme().is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_keys(ctx);
        self.draw_toolbar(ctx);
        self.draw_font_panel(ctx);
        self.draw_script_panel(ctx);
        self.draw_central(ctx);
        self.draw_dialogs(ctx);
        self.request_images();
    }
}

fn font_controls(ui: &mut egui::Ui, fonts: &mut FontSettings, theme: &Theme) {
    ui.label(egui::RichText::new("Headline").strong());
    family_combo(ui, "headline_font", &mut fonts.headline_font);
    size_combo(ui, "headline_size", &mut fonts.headline_size);
    weight_combo(ui, "headline_weight", &mut fonts.headline_weight);
    color_row(ui, "Color", &mut fonts.headline_color, theme.heading_color);
    ui.checkbox(&mut fonts.headline_uppercase, "UPPERCASE");
    ui.add_space(12.0);

    ui.label(egui::RichText::new("Body").strong());
    family_combo(ui, "body_font", &mut fonts.body_font);
    size_combo(ui, "body_size", &mut fonts.body_size);
    weight_combo(ui, "body_weight", &mut fonts.body_weight);
    color_row(ui, "Color", &mut fonts.body_color, theme.foreground);
    ui.add_space(12.0);

    ui.label(egui::RichText::new("Emphasis").strong());
    color_row(ui, "Accent", &mut fonts.accent_color, theme::DEFAULT_ACCENT);
}

fn family_combo(ui: &mut egui::Ui, id: &str, value: &mut String) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(value.as_str())
        .width(200.0)
        .show_ui(ui, |ui| {
            for family in FONT_FAMILIES {
                ui.selectable_value(value, family.to_string(), family);
            }
        });
}

fn size_combo(ui: &mut egui::Ui, id: &str, value: &mut SizeStep) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(format!("Size: {}", value.label()))
        .width(200.0)
        .show_ui(ui, |ui| {
            for step in SizeStep::ALL {
                ui.selectable_value(value, step, step.label());
            }
        });
}

fn weight_combo(ui: &mut egui::Ui, id: &str, value: &mut FontWeight) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(format!("Weight: {}", value.label()))
        .width(200.0)
        .show_ui(ui, |ui| {
            for weight in FontWeight::ALL {
                ui.selectable_value(value, weight, weight.label());
            }
        });
}

/// Hex color picker. An empty value means "follow the theme", shown with
/// the fallback color.
fn color_row(ui: &mut egui::Ui, label: &str, value: &mut String, fallback: egui::Color32) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut color = theme::parse_hex_color(value).unwrap_or(fallback);
        let picked = egui::color_picker::color_edit_button_srgba(
            ui,
            &mut color,
            egui::color_picker::Alpha::Opaque,
        );
        if picked.changed() {
            *value = theme::to_hex_color(color);
        }
        if value.is_empty() {
            ui.label(egui::RichText::new("theme").small().weak());
        } else if ui.small_button("Reset").clicked() {
            value.clear();
        }
    });
}

fn draw_loading(ui: &mut egui::Ui, rect: egui::Rect) {
    ui.scope_builder(egui::UiBuilder::new().max_rect(rect), |ui| {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
    });
}

/// Returns true when Reload was clicked.
fn draw_unavailable(ui: &mut egui::Ui, message: &str, admin_url: &str) -> bool {
    let mut reload = false;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading("Preview Unavailable");
        ui.add_space(8.0);
        ui.label(message);
        ui.add_space(16.0);
        ui.hyperlink_to("Back to funnels", admin_url);
        ui.add_space(8.0);
        reload = ui.button("Reload").clicked();
    });
    reload
}

fn draw_no_slides(ui: &mut egui::Ui, admin_url: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading("No Slides");
        ui.add_space(8.0);
        ui.label("This presentation has no slides yet. Add slides in the funnel editor.");
        ui.add_space(16.0);
        ui.hyperlink_to("Open funnel editor", admin_url);
    });
}

fn draw_counter(
    ui: &egui::Ui,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
    index: usize,
    len: usize,
) {
    ui.painter().text(
        egui::pos2(rect.right() - 24.0 * scale, rect.bottom() - 24.0 * scale),
        egui::Align2::RIGHT_BOTTOM,
        format!("{} / {len}", index + 1),
        egui::FontId::proportional(22.0 * scale),
        theme.muted,
    );
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let client = commands::client(&config, options.server.as_deref());
    tracing::info!("Using server {}", client.base_url());
    let id = Id::from(options.presentation.as_str());
    let worker = SyncWorker::new(client, id.clone())?;
    tracing::debug!("Previewing presentation {}", worker.presentation());
    let session = Session::new(
        config.default_theme().map(String::from),
        options.presenter,
    );

    let title = format!("Funnel Preview \u{00B7} {id}");
    let windowed = options.windowed || config.windowed();
    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(PreviewApp::new(
                cc.egui_ctx.clone(),
                worker,
                session,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
