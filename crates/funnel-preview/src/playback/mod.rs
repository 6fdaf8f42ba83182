pub mod audio_sync;
pub mod click_through;
pub mod player;
pub mod poll;
pub mod teleprompter;

use eframe::egui;

use crate::model::PreviewPayload;

use audio_sync::AudioSync;
use click_through::ClickThrough;
use teleprompter::Teleprompter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ClickThrough,
    AudioSynced,
    Teleprompter,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::ClickThrough => "Click-through",
            Mode::AudioSynced => "Audio synced",
            Mode::Teleprompter => "Presenter",
        }
    }
}

/// Pick the playback mode from the payload shape. Presenter mode is a manual
/// override that only applies when some slide carries script notes.
pub fn classify_mode(data: &PreviewPayload, presenter: bool) -> Mode {
    let flags = data.flags();
    if presenter && flags.has_script_notes {
        Mode::Teleprompter
    } else if flags.has_audio && flags.has_synced_timestamps {
        Mode::AudioSynced
    } else {
        Mode::ClickThrough
    }
}

/// Navigation keys understood by the controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Up,
    Down,
    Space,
}

impl NavKey {
    pub const ALL: [NavKey; 5] = [
        NavKey::Left,
        NavKey::Right,
        NavKey::Up,
        NavKey::Down,
        NavKey::Space,
    ];

    pub fn egui_key(self) -> egui::Key {
        match self {
            NavKey::Left => egui::Key::ArrowLeft,
            NavKey::Right => egui::Key::ArrowRight,
            NavKey::Up => egui::Key::ArrowUp,
            NavKey::Down => egui::Key::ArrowDown,
            NavKey::Space => egui::Key::Space,
        }
    }
}

/// The single mounted playback controller.
#[derive(Debug)]
pub enum Controller {
    ClickThrough(ClickThrough),
    AudioSynced(AudioSync),
    Teleprompter(Teleprompter),
}

impl Controller {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::ClickThrough => Controller::ClickThrough(ClickThrough::default()),
            Mode::AudioSynced => Controller::AudioSynced(AudioSync::default()),
            Mode::Teleprompter => Controller::Teleprompter(Teleprompter::default()),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Controller::ClickThrough(_) => Mode::ClickThrough,
            Controller::AudioSynced(_) => Mode::AudioSynced,
            Controller::Teleprompter(_) => Mode::Teleprompter,
        }
    }

    /// Flat timeline index of the slide on screen.
    pub fn active_index(&self, data: &PreviewPayload) -> usize {
        match self {
            Controller::ClickThrough(c) => c.index(),
            Controller::AudioSynced(a) => a.flat_index(data),
            Controller::Teleprompter(t) => t.index(),
        }
    }

    pub fn on_key(&mut self, key: NavKey, len: usize) {
        match self {
            Controller::ClickThrough(c) => c.on_key(key, len),
            Controller::Teleprompter(t) => t.on_key(key, len),
            // Audio drives slide changes; keys only start playback (handled by the session).
            Controller::AudioSynced(_) => {}
        }
    }

    /// Keep indices valid after the timeline was replaced.
    pub fn clamp(&mut self, len: usize) {
        match self {
            Controller::ClickThrough(c) => c.clamp(len),
            Controller::Teleprompter(t) => t.clamp(len),
            Controller::AudioSynced(_) => {}
        }
    }
}
