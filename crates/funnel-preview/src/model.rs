use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fonts::FontSettings;

/// Server-side identifier. The admin API uses numeric ids for most records,
/// but string ids are accepted as well and rendered verbatim in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{n}"),
            Id::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Ids typed by the user are kept as written, so `007` stays `007` in URLs.
impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

/// Response of `GET /api/admin/funnels/presentations/:id/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPayload {
    pub presentation: Presentation,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_settings: Option<FontSettings>,
}

/// One module of the deck: a variant (the backing media) and its slides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub module: Module,
    #[serde(default)]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Variant {
    /// The variant names audio-driven playback and actually carries an audio track.
    pub fn is_audio_backed(&self) -> bool {
        self.media_type.contains("audio") && self.audio().is_some()
    }

    pub fn audio(&self) -> Option<&str> {
        self.audio_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: Id,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Offset within the module's audio track. `0` means unsynced.
    #[serde(default)]
    pub start_time_ms: u64,
}

/// Editable text fields of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideField {
    Headline,
    Body,
}

impl SlideField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Headline => "headline",
            Self::Body => "body",
        }
    }
}

/// Derived slide layout. Never stored, always recomputed from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLayout {
    /// Headline only, rendered large and centered.
    Statement,
    /// Body only, rendered as large running text.
    Narrative,
    /// Headline above body.
    Standard,
}

impl SlideLayout {
    pub fn classify(has_headline: bool, has_body: bool) -> Option<Self> {
        match (has_headline, has_body) {
            (true, true) => Some(Self::Standard),
            (true, false) => Some(Self::Statement),
            (false, true) => Some(Self::Narrative),
            (false, false) => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::Narrative => "narrative",
            Self::Standard => "standard",
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl Slide {
    pub fn headline_text(&self) -> Option<&str> {
        non_blank(&self.headline)
    }

    pub fn body_text(&self) -> Option<&str> {
        non_blank(&self.body)
    }

    pub fn script_text(&self) -> Option<&str> {
        non_blank(&self.script_notes)
    }

    pub fn image(&self) -> Option<&str> {
        non_blank(&self.image_url).map(str::trim)
    }

    /// `None` for an empty slide (neither headline nor body).
    pub fn layout(&self) -> Option<SlideLayout> {
        SlideLayout::classify(self.headline_text().is_some(), self.body_text().is_some())
    }

    pub fn field(&self, field: SlideField) -> Option<&str> {
        match field {
            SlideField::Headline => self.headline.as_deref(),
            SlideField::Body => self.body.as_deref(),
        }
    }

    pub fn set_field(&mut self, field: SlideField, value: Option<String>) {
        match field {
            SlideField::Headline => self.headline = value,
            SlideField::Body => self.body = value,
        }
    }
}

/// Flags derived from the payload shape that drive mode selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineFlags {
    pub has_audio: bool,
    pub has_synced_timestamps: bool,
    pub has_script_notes: bool,
}

impl PreviewPayload {
    /// Stable sort of modules by `sortOrder`. Slide order inside a module is kept.
    pub fn normalize(&mut self) {
        self.timeline.sort_by_key(|entry| entry.module.sort_order);
    }

    /// The flattened timeline: every slide across all modules, in order.
    pub fn slides(&self) -> impl Iterator<Item = &Slide> {
        self.timeline.iter().flat_map(|entry| entry.slides.iter())
    }

    pub fn slide_count(&self) -> usize {
        self.timeline.iter().map(|entry| entry.slides.len()).sum()
    }

    pub fn slide_at(&self, index: usize) -> Option<&Slide> {
        self.slides().nth(index)
    }

    pub fn slide_mut(&mut self, id: &Id) -> Option<&mut Slide> {
        self.timeline
            .iter_mut()
            .flat_map(|entry| entry.slides.iter_mut())
            .find(|slide| &slide.id == id)
    }

    /// Flat index of the first slide of `module`.
    pub fn module_offset(&self, module: usize) -> usize {
        self.timeline
            .iter()
            .take(module)
            .map(|entry| entry.slides.len())
            .sum()
    }

    pub fn flags(&self) -> TimelineFlags {
        let has_audio = self
            .timeline
            .first()
            .and_then(|entry| entry.variant.as_ref())
            .is_some_and(Variant::is_audio_backed);
        TimelineFlags {
            has_audio,
            has_synced_timestamps: self.slides().any(|s| s.start_time_ms > 0),
            has_script_notes: self.slides().any(|s| s.script_text().is_some()),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn slide(id: i64, headline: Option<&str>, body: Option<&str>) -> Slide {
        Slide {
            id: Id::Num(id),
            headline: headline.map(String::from),
            body: body.map(String::from),
            script_notes: None,
            image_url: None,
            start_time_ms: 0,
        }
    }

    pub fn timed(id: i64, start_time_ms: u64) -> Slide {
        Slide {
            start_time_ms,
            ..slide(id, Some(&format!("Slide {id}")), None)
        }
    }

    pub fn entry(id: i64, variant: Option<Variant>, slides: Vec<Slide>) -> TimelineEntry {
        TimelineEntry {
            module: Module {
                id: Id::Num(id),
                name: Some(format!("Module {id}")),
                sort_order: id as i32,
            },
            variant,
            slides,
        }
    }

    pub fn audio_variant(url: &str) -> Variant {
        Variant {
            media_type: "audio_slides".to_string(),
            audio_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    pub fn payload(timeline: Vec<TimelineEntry>) -> PreviewPayload {
        PreviewPayload {
            presentation: Presentation {
                id: Id::Num(7),
                name: "Webinar".to_string(),
                theme: None,
                font_settings: None,
            },
            timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_layout_classification() {
        assert_eq!(
            slide(1, Some("Hi"), None).layout(),
            Some(SlideLayout::Statement)
        );
        assert_eq!(
            slide(1, None, Some("Text")).layout(),
            Some(SlideLayout::Narrative)
        );
        assert_eq!(
            slide(1, Some("Hi"), Some("Text")).layout(),
            Some(SlideLayout::Standard)
        );
    }

    #[test]
    fn test_empty_slide_has_no_layout() {
        assert_eq!(slide(1, None, None).layout(), None);
        assert_eq!(slide(1, Some("   "), Some("")).layout(), None);
    }

    #[test]
    fn test_deserialize_preview_payload() {
        let json = r#"{
            "presentation": {"id": 12, "name": "Launch", "theme": "midnight"},
            "timeline": [{
                "module": {"id": "m-1", "sortOrder": 0},
                "variant": {"mediaType": "audio_slides", "audioUrl": "/a.mp3", "durationMs": 9000},
                "slides": [
                    {"id": 1, "headline": "Welcome", "startTimeMs": 0},
                    {"id": 2, "body": "More", "scriptNotes": "say this", "startTimeMs": 2500}
                ]
            }]
        }"#;
        let payload: PreviewPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.presentation.id, Id::Num(12));
        assert_eq!(payload.timeline[0].module.id, Id::Text("m-1".into()));
        assert_eq!(payload.slide_count(), 2);
        let flags = payload.flags();
        assert!(flags.has_audio);
        assert!(flags.has_synced_timestamps);
        assert!(flags.has_script_notes);
    }

    #[test]
    fn test_audio_variant_without_url_is_not_audio_backed() {
        let variant = Variant {
            media_type: "audio_slides".into(),
            audio_url: Some("  ".into()),
            ..Default::default()
        };
        assert!(!variant.is_audio_backed());
        let click = Variant {
            media_type: "click_slides".into(),
            audio_url: Some("/a.mp3".into()),
            ..Default::default()
        };
        assert!(!click.is_audio_backed());
    }

    #[test]
    fn test_flatten_preserves_module_order() {
        let mut payload = payload(vec![
            entry(2, None, vec![slide(20, Some("b"), None)]),
            entry(1, None, vec![slide(10, Some("a"), None), slide(11, None, Some("c"))]),
        ]);
        payload.normalize();
        let ids: Vec<String> = payload.slides().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, ["10", "11", "20"]);
        assert_eq!(payload.module_offset(1), 2);
        assert_eq!(payload.slide_at(2).map(|s| s.id.clone()), Some(Id::Num(20)));
    }

    #[test]
    fn test_slide_mut_by_id() {
        let mut payload = payload(vec![entry(1, None, vec![slide(5, Some("x"), None)])]);
        payload
            .slide_mut(&Id::Num(5))
            .unwrap()
            .set_field(SlideField::Body, Some("new".into()));
        assert_eq!(payload.slides().next().unwrap().body_text(), Some("new"));
        assert!(payload.slide_mut(&Id::Num(99)).is_none());
    }

    #[test]
    fn test_id_from_str_is_verbatim() {
        assert_eq!(Id::from("abc"), Id::Text("abc".into()));
        assert_eq!(Id::from("007").to_string(), "007");
        assert_eq!(Id::from("42").to_string(), Id::Num(42).to_string());
    }
}
