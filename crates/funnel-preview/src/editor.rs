use crate::model::{Id, Slide, SlideField};

/// A committed inline edit, ready to apply locally and persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideEdit {
    pub slide_id: Id,
    pub field: SlideField,
    /// Trimmed text, or `None` when the field was cleared.
    pub value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    pub field: SlideField,
    pub buffer: String,
    original: String,
    /// Set until the text box has been focused once.
    pub needs_focus: bool,
}

/// Click-to-edit state for the slide currently on screen.
#[derive(Debug, Default)]
pub struct InlineEditor {
    slide_id: Option<Id>,
    session: Option<EditSession>,
}

impl InlineEditor {
    /// Track the slide on screen. A change of slide identity drops any
    /// in-progress edit without saving it.
    pub fn sync_slide(&mut self, id: Option<&Id>) {
        if self.slide_id.as_ref() != id {
            self.slide_id = id.cloned();
            self.session = None;
        }
    }

    pub fn begin(&mut self, slide: &Slide, field: SlideField) {
        let original = slide.field(field).unwrap_or_default().to_string();
        self.slide_id = Some(slide.id.clone());
        self.session = Some(EditSession {
            field,
            buffer: original.clone(),
            original,
            needs_focus: true,
        });
    }

    pub fn editing(&self) -> Option<SlideField> {
        self.session.as_ref().map(|s| s.field)
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Close the editor. Returns an edit only when the trimmed text differs
    /// from the original value.
    pub fn commit(&mut self) -> Option<SlideEdit> {
        let session = self.session.take()?;
        let slide_id = self.slide_id.clone()?;
        let trimmed = session.buffer.trim();
        if trimmed == session.original {
            return None;
        }
        Some(SlideEdit {
            slide_id,
            field: session.field,
            value: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::slide;

    #[test]
    fn test_commit_trims_changed_value() {
        let s = slide(1, Some("Old"), None);
        let mut editor = InlineEditor::default();
        editor.begin(&s, SlideField::Headline);
        editor.session_mut().unwrap().buffer = "  New headline \n".into();
        assert_eq!(
            editor.commit(),
            Some(SlideEdit {
                slide_id: Id::Num(1),
                field: SlideField::Headline,
                value: Some("New headline".into()),
            })
        );
        assert!(editor.editing().is_none());
    }

    #[test]
    fn test_unchanged_value_is_not_committed() {
        let s = slide(1, None, Some("Body"));
        let mut editor = InlineEditor::default();
        editor.begin(&s, SlideField::Body);
        editor.session_mut().unwrap().buffer = "Body  ".into();
        assert_eq!(editor.commit(), None);
    }

    #[test]
    fn test_cleared_field_commits_null() {
        let s = slide(3, Some("Headline"), Some("Body"));
        let mut editor = InlineEditor::default();
        editor.begin(&s, SlideField::Headline);
        editor.session_mut().unwrap().buffer = "   ".into();
        let edit = editor.commit().unwrap();
        assert_eq!(edit.value, None);
    }

    #[test]
    fn test_cancel_discards() {
        let s = slide(1, Some("Old"), None);
        let mut editor = InlineEditor::default();
        editor.begin(&s, SlideField::Headline);
        editor.session_mut().unwrap().buffer = "New".into();
        editor.cancel();
        assert_eq!(editor.commit(), None);
    }

    #[test]
    fn test_slide_change_resets_edit() {
        let s = slide(1, Some("Old"), None);
        let mut editor = InlineEditor::default();
        editor.begin(&s, SlideField::Headline);
        editor.sync_slide(Some(&Id::Num(1)));
        assert_eq!(editor.editing(), Some(SlideField::Headline));
        editor.sync_slide(Some(&Id::Num(2)));
        assert!(editor.editing().is_none());
    }
}
