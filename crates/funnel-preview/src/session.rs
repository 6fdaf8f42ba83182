//! Presentation state owned by the UI thread.
//!
//! `Session` holds the loaded timeline, the mounted playback controller,
//! theme and font state, the rewrite gate and the queue of failed saves.
//! It never performs I/O: every change that must reach the server comes back
//! to the caller as a [`Mutation`], and every background completion is fed
//! back in through one of the `on_*` methods.

use std::time::Duration;

use crate::editor::SlideEdit;
use crate::error::ApiResult;
use crate::fonts::{FontPanel, FontSettings};
use crate::model::{PreviewPayload, Slide};
use crate::playback::audio_sync::{AudioCue, AudioPhase};
use crate::playback::{Controller, Mode, NavKey, classify_mode};
use crate::sync::Mutation;
use crate::theme::Theme;
use crate::transform::{TransformGate, TransformRequest};

const GENERIC_LOAD_ERROR: &str = "The presentation could not be loaded.";
const GENERIC_TRANSFORM_ERROR: &str = "The rewrite failed. Your slides were not changed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Unavailable(String),
    NoSlides,
    Deck,
}

pub struct Session {
    data: Option<PreviewPayload>,
    view: View,
    presenter: bool,
    controller: Controller,
    theme: Theme,
    default_theme: Option<String>,
    fonts: FontPanel,
    transform: TransformGate,
    failed: Vec<Mutation>,
    /// Latest save handed out per target. Completions of anything older are
    /// superseded and neither clear nor join the retry queue.
    issued: Vec<Mutation>,
    alert: Option<String>,
}

impl Session {
    pub fn new(default_theme: Option<String>, presenter: bool) -> Self {
        Self {
            data: None,
            view: View::Loading,
            presenter,
            controller: Controller::for_mode(Mode::ClickThrough),
            theme: Theme::resolve(default_theme.as_deref()),
            default_theme,
            fonts: FontPanel::new(FontSettings::default()),
            transform: TransformGate::default(),
            failed: Vec::new(),
            issued: Vec::new(),
            alert: None,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn data(&self) -> Option<&PreviewPayload> {
        self.data.as_ref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn font_panel(&self) -> &FontPanel {
        &self.fonts
    }

    pub fn font_panel_mut(&mut self) -> &mut FontPanel {
        &mut self.fonts
    }

    pub fn transform_gate(&self) -> &TransformGate {
        &self.transform
    }

    pub fn transform_gate_mut(&mut self) -> &mut TransformGate {
        &mut self.transform
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn presenter(&self) -> bool {
        self.presenter
    }

    pub fn slide_count(&self) -> usize {
        self.data.as_ref().map_or(0, PreviewPayload::slide_count)
    }

    pub fn current_index(&self) -> usize {
        self.data
            .as_ref()
            .map_or(0, |data| self.controller.active_index(data))
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.data.as_ref()?.slide_at(self.current_index())
    }

    // --- loading ---------------------------------------------------------

    pub fn begin_reload(&mut self) {
        self.view = View::Loading;
    }

    pub fn on_loaded(&mut self, payload: PreviewPayload) {
        tracing::info!(
            "Loaded \"{}\": {} modules, {} slides",
            payload.presentation.name,
            payload.timeline.len(),
            payload.slide_count()
        );
        self.install(payload);
    }

    pub fn on_load_failed(&mut self, message: &str) {
        let message = if message.trim().is_empty() {
            GENERIC_LOAD_ERROR.to_string()
        } else {
            message.to_string()
        };
        self.view = View::Unavailable(message);
    }

    /// Replace the timeline wholesale. Theme and font state follow the new
    /// presentation record; the playback mode is re-evaluated.
    fn install(&mut self, payload: PreviewPayload) {
        let theme = payload
            .presentation
            .theme
            .as_deref()
            .filter(|name| Theme::is_known(name))
            .or(self.default_theme.as_deref());
        self.theme = Theme::resolve(theme);
        let open = self.fonts.open;
        self.fonts = FontPanel::new(payload.presentation.font_settings.clone().unwrap_or_default());
        self.fonts.open = open;

        self.view = if payload.slide_count() == 0 {
            View::NoSlides
        } else {
            View::Deck
        };
        self.data = Some(payload);
        if self.mode() == Mode::AudioSynced {
            // Module and slide positions belong to the replaced timeline.
            self.controller = Controller::for_mode(Mode::AudioSynced);
        }
        self.remount();
    }

    /// Mount the controller for the current data and presenter toggle.
    /// Keeps the existing controller when the mode is unchanged.
    fn remount(&mut self) -> bool {
        let Some(data) = &self.data else {
            return false;
        };
        let mode = classify_mode(data, self.presenter);
        let len = data.slide_count();
        if mode == self.controller.mode() {
            self.controller.clamp(len);
            return false;
        }
        tracing::info!("Playback mode: {}", mode.label());
        self.controller = Controller::for_mode(mode);
        true
    }

    /// Returns true when the mounted mode changed.
    pub fn toggle_presenter(&mut self) -> bool {
        self.presenter = !self.presenter;
        self.remount()
    }

    // --- navigation ------------------------------------------------------

    /// Keyboard navigation. In audio mode `Space` starts (or restarts)
    /// playback when nothing is playing and returns the cue to load.
    pub fn on_key(&mut self, key: NavKey) -> Option<AudioCue> {
        let len = self.slide_count();
        if self.view != View::Deck {
            return None;
        }
        match self.audio_phase().cloned() {
            Some(AudioPhase::Playing | AudioPhase::Loading) => None,
            Some(_) if key == NavKey::Space => self.start_audio(),
            Some(_) => None,
            None => {
                self.controller.on_key(key, len);
                None
            }
        }
    }

    pub fn go_to(&mut self, index: usize) {
        let len = self.slide_count();
        match &mut self.controller {
            Controller::ClickThrough(c) => c.go_to(index, len),
            Controller::Teleprompter(t) => t.activate(index, len),
            Controller::AudioSynced(_) => {}
        }
    }

    pub fn take_scroll_request(&mut self) -> bool {
        match &mut self.controller {
            Controller::Teleprompter(t) => t.take_scroll_request(),
            _ => false,
        }
    }

    // --- audio -----------------------------------------------------------

    pub fn audio_phase(&self) -> Option<&AudioPhase> {
        match &self.controller {
            Controller::AudioSynced(sync) => Some(sync.phase()),
            _ => None,
        }
    }

    pub fn start_audio(&mut self) -> Option<AudioCue> {
        let data = self.data.as_ref()?;
        match &mut self.controller {
            Controller::AudioSynced(sync) => sync.start(data),
            _ => None,
        }
    }

    pub fn audio_ready(&mut self, module: usize) -> bool {
        match &mut self.controller {
            Controller::AudioSynced(sync) => sync.audio_ready(module),
            _ => false,
        }
    }

    pub fn audio_failed(&mut self, module: usize, message: String) {
        if let Controller::AudioSynced(sync) = &mut self.controller {
            sync.audio_failed(module, message);
        }
    }

    pub fn audio_tick(&mut self, position: Duration) {
        if let (Some(data), Controller::AudioSynced(sync)) = (&self.data, &mut self.controller) {
            sync.on_tick(data, position);
        }
    }

    /// The playing track ended. Returns the next module's cue, if any.
    pub fn audio_ended(&mut self) -> Option<AudioCue> {
        match (&self.data, &mut self.controller) {
            (Some(data), Controller::AudioSynced(sync)) => sync.on_ended(data),
            _ => None,
        }
    }

    // --- persistence -----------------------------------------------------

    /// Switch theme locally. Returns the save to run, or `None` for an
    /// unknown or unchanged theme.
    pub fn set_theme(&mut self, name: &str) -> Option<Mutation> {
        if !Theme::is_known(name) || self.theme.name == name {
            return None;
        }
        self.theme = Theme::resolve(Some(name));
        if let Some(data) = &mut self.data {
            data.presentation.theme = Some(name.to_string());
        }
        Some(self.issue(Mutation::Theme(name.to_string())))
    }

    pub fn save_fonts(&mut self) -> Mutation {
        let settings = self.fonts.save();
        if let Some(data) = &mut self.data {
            data.presentation.font_settings = Some(settings.clone());
        }
        self.issue(Mutation::Fonts(settings))
    }

    /// Apply a committed inline edit to local data. The returned mutation
    /// persists it; local state is not rolled back if that fails.
    pub fn apply_edit(&mut self, edit: SlideEdit) -> Option<Mutation> {
        let slide = self.data.as_mut()?.slide_mut(&edit.slide_id)?;
        slide.set_field(edit.field, edit.value.clone());
        Some(self.issue(Mutation::Slide(edit)))
    }

    fn issue(&mut self, mutation: Mutation) -> Mutation {
        self.issued.retain(|m| !same_target(m, &mutation));
        self.issued.push(mutation.clone());
        mutation
    }

    /// False when a different save for the same target was issued later.
    fn is_current(&self, mutation: &Mutation) -> bool {
        self.issued
            .iter()
            .find(|m| same_target(m, mutation))
            .is_none_or(|m| m == mutation)
    }

    /// Outcome of a save. Failures are queued for retry and yield the toast
    /// text; a success clears failures for the same target. Completions of
    /// superseded saves are ignored.
    pub fn on_saved(&mut self, mutation: Mutation, result: ApiResult<()>) -> Option<String> {
        if !self.is_current(&mutation) {
            tracing::debug!("Ignoring superseded save of {}", mutation.describe());
            return None;
        }
        self.failed.retain(|m| !same_target(m, &mutation));
        match result {
            Ok(()) => {
                tracing::debug!("Saved {}", mutation.describe());
                None
            }
            Err(e) => {
                let message = format!("Could not save {}: {e}", mutation.describe());
                self.failed.push(mutation);
                Some(message)
            }
        }
    }

    pub fn failed_saves(&self) -> &[Mutation] {
        &self.failed
    }

    pub fn take_failed_saves(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.failed)
    }

    // --- rewrites --------------------------------------------------------

    pub fn confirm_transform(&mut self) -> Option<TransformRequest> {
        if self.view != View::Deck && self.view != View::NoSlides {
            self.transform.cancel();
            return None;
        }
        self.transform.confirm()
    }

    pub fn on_transform_finished(
        &mut self,
        request: TransformRequest,
        result: ApiResult<PreviewPayload>,
    ) {
        self.transform.finish();
        match result {
            Ok(payload) => {
                tracing::info!("{} rewrite applied", request.style.label());
                self.install(payload);
            }
            Err(e) => {
                tracing::warn!("{} rewrite failed: {e}", request.style.label());
                self.alert = Some(
                    e.server_detail()
                        .unwrap_or(GENERIC_TRANSFORM_ERROR)
                        .to_string(),
                );
            }
        }
    }

    /// A rewrite confirmation or failure alert is waiting on the user.
    /// Slide input stays blocked until it is answered.
    pub fn modal_open(&self) -> bool {
        self.transform.pending().is_some() || self.alert.is_some()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

fn same_target(a: &Mutation, b: &Mutation) -> bool {
    match (a, b) {
        (Mutation::Theme(_), Mutation::Theme(_)) | (Mutation::Fonts(_), Mutation::Fonts(_)) => true,
        (Mutation::Slide(a), Mutation::Slide(b)) => a.slide_id == b.slide_id && a.field == b.field,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::model::fixtures::*;
    use crate::model::{Id, SlideField, SlideLayout, Variant};
    use crate::transform::TransformStyle;

    fn click_deck() -> PreviewPayload {
        payload(vec![entry(
            1,
            Some(Variant {
                media_type: "click_slides".into(),
                ..Default::default()
            }),
            vec![
                slide(1, Some("Welcome"), None),
                slide(2, None, Some("Thanks for joining")),
            ],
        )])
    }

    fn loaded(data: PreviewPayload) -> Session {
        let mut session = Session::new(None, false);
        session.on_loaded(data);
        session
    }

    #[test]
    fn test_click_through_walkthrough() {
        let mut session = loaded(click_deck());
        assert_eq!(session.view(), &View::Deck);
        assert_eq!(session.mode(), Mode::ClickThrough);
        assert_eq!(
            session.current_slide().unwrap().layout(),
            Some(SlideLayout::Statement)
        );

        session.on_key(NavKey::Right);
        assert_eq!(session.current_index(), 1);
        assert_eq!(
            session.current_slide().unwrap().layout(),
            Some(SlideLayout::Narrative)
        );

        session.on_key(NavKey::Right);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_cleared_headline_persists_null_and_relayouts() {
        let mut data = click_deck();
        data.timeline[0].slides[0].body = Some("Subtitle".into());
        let mut session = loaded(data);
        assert_eq!(
            session.current_slide().unwrap().layout(),
            Some(SlideLayout::Standard)
        );

        let mutation = session
            .apply_edit(SlideEdit {
                slide_id: Id::Num(1),
                field: SlideField::Headline,
                value: None,
            })
            .unwrap();
        let Mutation::Slide(edit) = &mutation else {
            panic!("expected slide mutation");
        };
        assert_eq!(edit.value, None);
        let slide = session.current_slide().unwrap();
        assert_eq!(slide.headline, None);
        assert_eq!(slide.layout(), Some(SlideLayout::Narrative));
    }

    #[test]
    fn test_edit_for_unknown_slide_is_ignored() {
        let mut session = loaded(click_deck());
        let edit = SlideEdit {
            slide_id: Id::Num(99),
            field: SlideField::Body,
            value: Some("x".into()),
        };
        assert!(session.apply_edit(edit).is_none());
    }

    #[test]
    fn test_empty_timeline_is_no_slides() {
        let session = loaded(payload(vec![entry(1, None, vec![])]));
        assert_eq!(session.view(), &View::NoSlides);
        assert!(session.current_slide().is_none());
    }

    #[test]
    fn test_load_failure_message() {
        let mut session = Session::new(None, false);
        session.on_load_failed("Presentation not found");
        assert_eq!(
            session.view(),
            &View::Unavailable("Presentation not found".into())
        );
        session.on_load_failed(" ");
        assert_eq!(session.view(), &View::Unavailable(GENERIC_LOAD_ERROR.into()));
    }

    #[test]
    fn test_presenter_toggle_remounts() {
        let mut data = click_deck();
        data.timeline[0].slides[1].script_notes = Some("Thank everyone".into());
        let mut session = loaded(data);
        session.on_key(NavKey::Right);
        assert!(session.toggle_presenter());
        assert_eq!(session.mode(), Mode::Teleprompter);
        assert_eq!(session.current_index(), 0);
        assert!(session.toggle_presenter());
        assert_eq!(session.mode(), Mode::ClickThrough);
    }

    #[test]
    fn test_presenter_toggle_without_notes_keeps_mode() {
        let mut session = loaded(click_deck());
        assert!(!session.toggle_presenter());
        assert_eq!(session.mode(), Mode::ClickThrough);
    }

    #[test]
    fn test_theme_from_payload_and_switch() {
        let mut data = click_deck();
        data.presentation.theme = Some("midnight".into());
        let mut session = loaded(data);
        assert_eq!(session.theme().name, "midnight");

        assert_eq!(session.set_theme("midnight"), None);
        assert_eq!(session.set_theme("neon"), None);
        assert_eq!(
            session.set_theme("light"),
            Some(Mutation::Theme("light".into()))
        );
        assert_eq!(session.theme().name, "light");
        assert_eq!(
            session.data().unwrap().presentation.theme.as_deref(),
            Some("light")
        );
    }

    #[test]
    fn test_unknown_payload_theme_uses_configured_default() {
        let mut data = click_deck();
        data.presentation.theme = Some("neon".into());
        let mut session = Session::new(Some("forest".into()), false);
        session.on_loaded(data);
        assert_eq!(session.theme().name, "forest");
    }

    #[test]
    fn test_font_save_clears_dirty() {
        let mut session = loaded(click_deck());
        session.font_panel_mut().open = true;
        session
            .font_panel_mut()
            .update(|f| f.headline_uppercase = true);
        assert!(session.font_panel().is_dirty());

        let Mutation::Fonts(saved) = session.save_fonts() else {
            panic!("expected font mutation");
        };
        assert!(saved.headline_uppercase);
        assert!(!session.font_panel().is_dirty());
        assert!(!session.font_panel().open);
        assert_eq!(
            session.data().unwrap().presentation.font_settings,
            Some(saved)
        );
    }

    #[test]
    fn test_failed_saves_queue_and_supersede() {
        let mut session = loaded(click_deck());
        let toast = session.on_saved(
            Mutation::Theme("light".into()),
            Err(ApiError::status(500, r#"{"error":"boom"}"#)),
        );
        assert_eq!(toast.as_deref(), Some("Could not save theme \"light\": boom"));
        session.on_saved(
            Mutation::Theme("forest".into()),
            Err(ApiError::status(500, "")),
        );
        assert_eq!(
            session.failed_saves(),
            &[Mutation::Theme("forest".into())]
        );

        assert!(session.on_saved(Mutation::Theme("dark".into()), Ok(())).is_none());
        assert!(session.failed_saves().is_empty());
    }

    #[test]
    fn test_out_of_order_completion_keeps_latest_theme() {
        let mut session = loaded(click_deck());
        let light = session.set_theme("light").unwrap();
        let forest = session.set_theme("forest").unwrap();

        assert!(session.on_saved(forest, Ok(())).is_none());
        let toast = session.on_saved(light, Err(ApiError::status(500, "")));
        assert!(toast.is_none());
        assert_eq!(session.theme().name, "forest");
        assert!(session.failed_saves().is_empty());
    }

    #[test]
    fn test_older_success_does_not_clear_newer_failure() {
        let mut session = loaded(click_deck());
        let light = session.set_theme("light").unwrap();
        let forest = session.set_theme("forest").unwrap();

        session.on_saved(forest.clone(), Err(ApiError::status(503, "")));
        assert!(session.on_saved(light, Ok(())).is_none());
        assert_eq!(session.failed_saves(), &[forest]);
    }

    #[test]
    fn test_superseded_slide_edit_failure_is_dropped() {
        let mut session = loaded(click_deck());
        let first = SlideEdit {
            slide_id: Id::Num(1),
            field: SlideField::Headline,
            value: Some("Draft".into()),
        };
        let second = SlideEdit {
            value: Some("Final".into()),
            ..first.clone()
        };
        let first = session.apply_edit(first).unwrap();
        let second = session.apply_edit(second).unwrap();

        session.on_saved(second, Ok(()));
        session.on_saved(first, Err(ApiError::status(500, "")));
        assert!(session.failed_saves().is_empty());
        assert_eq!(session.current_slide().unwrap().headline_text(), Some("Final"));
    }

    #[test]
    fn test_retry_drains_queue() {
        let mut session = loaded(click_deck());
        let edit = SlideEdit {
            slide_id: Id::Num(1),
            field: SlideField::Headline,
            value: Some("Hi".into()),
        };
        session.on_saved(Mutation::Slide(edit.clone()), Err(ApiError::status(502, "")));
        session.on_saved(Mutation::Fonts(FontSettings::default()), Err(ApiError::status(502, "")));
        let retry = session.take_failed_saves();
        assert_eq!(retry.len(), 2);
        assert_eq!(retry[0], Mutation::Slide(edit));
        assert!(session.failed_saves().is_empty());
    }

    #[test]
    fn test_transform_success_replaces_data() {
        let mut session = loaded(click_deck());
        session.on_key(NavKey::Right);
        session
            .transform_gate_mut()
            .request(TransformStyle::Impact);
        let request = session.confirm_transform().unwrap();
        assert!(session.transform_gate().is_running());

        let rewritten = payload(vec![entry(
            1,
            None,
            vec![slide(10, Some("**Bold** start"), None)],
        )]);
        session.on_transform_finished(request, Ok(rewritten));
        assert!(!session.transform_gate().is_running());
        assert_eq!(session.slide_count(), 1);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_slide().unwrap().id, Id::Num(10));
    }

    #[test]
    fn test_transform_failure_alerts_and_keeps_data() {
        let mut session = loaded(click_deck());
        session
            .transform_gate_mut()
            .request(TransformStyle::MattsStyle);
        let request = session.confirm_transform().unwrap();
        session.on_transform_finished(
            request,
            Err(ApiError::status(500, r#"{"error":"Model overloaded"}"#)),
        );
        assert_eq!(session.alert(), Some("Model overloaded"));
        assert!(session.modal_open());
        assert!(!session.transform_gate().is_running());
        assert_eq!(session.slide_count(), 2);
        session.dismiss_alert();
        assert!(session.alert().is_none());
        assert!(!session.modal_open());
    }

    #[test]
    fn test_pending_confirmation_blocks_until_answered() {
        let mut session = loaded(click_deck());
        assert!(!session.modal_open());
        session.transform_gate_mut().request(TransformStyle::Impact);
        assert!(session.modal_open());
        session.transform_gate_mut().cancel();
        assert!(!session.modal_open());

        session.transform_gate_mut().request(TransformStyle::Impact);
        session.confirm_transform().unwrap();
        assert!(!session.modal_open());
    }

    #[test]
    fn test_transform_failure_without_server_message_is_generic() {
        let mut session = loaded(click_deck());
        session.transform_gate_mut().request(TransformStyle::Master);
        let request = session.confirm_transform().unwrap();
        session.on_transform_finished(request, Err(ApiError::status(504, "<html>")));
        assert_eq!(session.alert(), Some(GENERIC_TRANSFORM_ERROR));
    }

    #[test]
    fn test_transform_during_playback_resets_audio() {
        let deck = || {
            payload(vec![entry(
                1,
                Some(audio_variant("/a.mp3")),
                vec![timed(1, 0), timed(2, 2000), timed(3, 5000)],
            )])
        };
        let mut session = loaded(deck());
        let cue = session.start_audio().unwrap();
        assert!(session.audio_ready(cue.module));
        session.audio_tick(Duration::from_millis(3000));
        assert_eq!(session.current_index(), 1);

        session.transform_gate_mut().request(TransformStyle::Impact);
        let request = session.confirm_transform().unwrap();
        session.on_transform_finished(request, Ok(deck()));
        assert_eq!(session.mode(), Mode::AudioSynced);
        assert_eq!(session.audio_phase(), Some(&AudioPhase::Idle));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_audio_session_flow() {
        let data = payload(vec![entry(
            1,
            Some(audio_variant("/a.mp3")),
            vec![timed(1, 0), timed(2, 2000), timed(3, 5000)],
        )]);
        let mut session = loaded(data);
        assert_eq!(session.mode(), Mode::AudioSynced);
        assert_eq!(session.audio_phase(), Some(&AudioPhase::Idle));

        session.on_key(NavKey::Right);
        assert_eq!(session.current_index(), 0);

        let cue = session.on_key(NavKey::Space).unwrap();
        assert_eq!(cue.url, "/a.mp3");
        assert!(session.on_key(NavKey::Space).is_none());
        assert!(session.audio_ready(cue.module));
        session.audio_tick(Duration::from_millis(3000));
        assert_eq!(session.current_index(), 1);
        assert!(session.audio_ended().is_none());
        assert_eq!(session.audio_phase(), Some(&AudioPhase::Finished));
        assert!(session.on_key(NavKey::Space).is_some());
    }
}
