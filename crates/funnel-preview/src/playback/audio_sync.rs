use std::time::Duration;

use crate::model::{PreviewPayload, Slide};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPhase {
    /// Waiting for the user to press start.
    Idle,
    /// Audio for the current module is downloading/decoding.
    Loading,
    Playing,
    Finished,
    Failed(String),
}

/// Instruction to load and play one module's audio track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCue {
    pub module: usize,
    pub url: String,
}

/// Index of the last slide whose start time is at or before the playhead.
/// Slides are expected in ascending `startTimeMs` order; on ties the later
/// slide wins. Falls back to the first slide.
pub fn active_slide(slides: &[Slide], position_ms: u64) -> usize {
    let mut active = 0;
    for (i, slide) in slides.iter().enumerate() {
        if slide.start_time_ms <= position_ms {
            active = i;
        }
    }
    active
}

/// Audio-driven playback position: which module is playing and which of its
/// slides the playhead is on.
#[derive(Debug)]
pub struct AudioSync {
    module: usize,
    slide: usize,
    phase: AudioPhase,
}

impl Default for AudioSync {
    fn default() -> Self {
        Self {
            module: 0,
            slide: 0,
            phase: AudioPhase::Idle,
        }
    }
}

impl AudioSync {
    pub fn phase(&self) -> &AudioPhase {
        &self.phase
    }

    pub fn module(&self) -> usize {
        self.module
    }

    pub fn is_playing(&self) -> bool {
        self.phase == AudioPhase::Playing
    }

    /// Begin (or restart) playback from the first module.
    pub fn start(&mut self, data: &PreviewPayload) -> Option<AudioCue> {
        self.module = 0;
        self.slide = 0;
        self.cue(data)
    }

    fn cue(&mut self, data: &PreviewPayload) -> Option<AudioCue> {
        let url = data
            .timeline
            .get(self.module)
            .and_then(|entry| entry.variant.as_ref())
            .and_then(|variant| variant.audio())
            .map(String::from);
        match url {
            Some(url) => {
                self.phase = AudioPhase::Loading;
                Some(AudioCue {
                    module: self.module,
                    url,
                })
            }
            None => {
                self.phase = AudioPhase::Finished;
                None
            }
        }
    }

    /// Audio for `module` is playing. Returns false if the cue is stale.
    pub fn audio_ready(&mut self, module: usize) -> bool {
        if self.phase != AudioPhase::Loading || module != self.module {
            return false;
        }
        self.phase = AudioPhase::Playing;
        true
    }

    pub fn audio_failed(&mut self, module: usize, message: String) {
        if module == self.module && self.phase == AudioPhase::Loading {
            self.phase = AudioPhase::Failed(message);
        }
    }

    /// Playhead update from the polling task.
    pub fn on_tick(&mut self, data: &PreviewPayload, position: Duration) {
        if !self.is_playing() {
            return;
        }
        if let Some(entry) = data.timeline.get(self.module) {
            self.slide = active_slide(&entry.slides, position.as_millis() as u64);
        }
    }

    /// The current track ended: move to the next module's first slide and cue
    /// its audio, or finish.
    pub fn on_ended(&mut self, data: &PreviewPayload) -> Option<AudioCue> {
        if !self.is_playing() {
            return None;
        }
        if self.module + 1 >= data.timeline.len() {
            self.phase = AudioPhase::Finished;
            return None;
        }
        self.module += 1;
        self.slide = 0;
        self.cue(data)
    }

    pub fn flat_index(&self, data: &PreviewPayload) -> usize {
        let index = data.module_offset(self.module) + self.slide;
        index.min(data.slide_count().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;

    fn two_modules() -> PreviewPayload {
        payload(vec![
            entry(
                1,
                Some(audio_variant("/one.mp3")),
                vec![timed(1, 0), timed(2, 2000), timed(3, 5000)],
            ),
            entry(
                2,
                Some(audio_variant("/two.mp3")),
                vec![timed(4, 0), timed(5, 1000)],
            ),
        ])
    }

    #[test]
    fn test_scan_picks_last_slide_at_or_before_playhead() {
        let slides = vec![timed(1, 0), timed(2, 2000), timed(3, 5000)];
        assert_eq!(active_slide(&slides, 3000), 1);
        assert_eq!(active_slide(&slides, 0), 0);
        assert_eq!(active_slide(&slides, 5000), 2);
        assert_eq!(active_slide(&slides, 99_999), 2);
    }

    #[test]
    fn test_scan_ties_latest_wins() {
        let slides = vec![timed(1, 0), timed(2, 1000), timed(3, 1000)];
        assert_eq!(active_slide(&slides, 1000), 2);
    }

    #[test]
    fn test_scan_before_first_start_uses_first_slide() {
        let slides = vec![timed(1, 500), timed(2, 900)];
        assert_eq!(active_slide(&slides, 100), 0);
        assert_eq!(active_slide(&[], 100), 0);
    }

    #[test]
    fn test_start_cues_first_module() {
        let data = two_modules();
        let mut sync = AudioSync::default();
        assert_eq!(sync.phase(), &AudioPhase::Idle);
        let cue = sync.start(&data).unwrap();
        assert_eq!(cue, AudioCue { module: 0, url: "/one.mp3".into() });
        assert_eq!(sync.phase(), &AudioPhase::Loading);
    }

    #[test]
    fn test_ticks_ignored_until_audio_ready() {
        let data = two_modules();
        let mut sync = AudioSync::default();
        sync.start(&data);
        sync.on_tick(&data, Duration::from_millis(3000));
        assert_eq!(sync.flat_index(&data), 0);
        assert!(sync.audio_ready(0));
        sync.on_tick(&data, Duration::from_millis(3000));
        assert_eq!(sync.flat_index(&data), 1);
    }

    #[test]
    fn test_ended_advances_to_next_module() {
        let data = two_modules();
        let mut sync = AudioSync::default();
        sync.start(&data);
        sync.audio_ready(0);
        sync.on_tick(&data, Duration::from_millis(6000));
        assert_eq!(sync.flat_index(&data), 2);

        let cue = sync.on_ended(&data).unwrap();
        assert_eq!(cue, AudioCue { module: 1, url: "/two.mp3".into() });
        assert_eq!(sync.flat_index(&data), 3);
        assert!(!sync.audio_ready(0), "stale cue must be ignored");
        assert!(sync.audio_ready(1));
        sync.on_tick(&data, Duration::from_millis(1200));
        assert_eq!(sync.flat_index(&data), 4);

        assert_eq!(sync.on_ended(&data), None);
        assert_eq!(sync.phase(), &AudioPhase::Finished);
        assert_eq!(sync.flat_index(&data), 4);
    }

    #[test]
    fn test_next_module_without_audio_finishes() {
        let data = payload(vec![
            entry(1, Some(audio_variant("/one.mp3")), vec![timed(1, 0), timed(2, 10)]),
            entry(2, None, vec![timed(3, 0)]),
        ]);
        let mut sync = AudioSync::default();
        sync.start(&data);
        sync.audio_ready(0);
        assert_eq!(sync.on_ended(&data), None);
        assert_eq!(sync.phase(), &AudioPhase::Finished);
        assert_eq!(sync.flat_index(&data), 2);
    }

    #[test]
    fn test_failure_then_restart() {
        let data = two_modules();
        let mut sync = AudioSync::default();
        sync.start(&data);
        sync.audio_failed(0, "decode error".into());
        assert_eq!(sync.phase(), &AudioPhase::Failed("decode error".into()));
        assert!(sync.start(&data).is_some());
        assert_eq!(sync.phase(), &AudioPhase::Loading);
    }
}
