use draftly_core::{BlockId, EditSurface, EditorSession, KeyDisposition, KeyEvent, Rect};
use std::collections::HashMap;

pub const ROW_HEIGHT: f32 = 32.0;

/// Scripted stand-in for an editable surface. Keeps one text node per block
/// and counts forced overwrites so tests can assert the caret was left alone.
#[derive(Default)]
pub struct MockSurface {
    texts: HashMap<BlockId, String>,
    rows: HashMap<BlockId, usize>,
    pub caret: usize,
    pub focused: Option<BlockId>,
    pub overwrites: usize,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirrors the session's block order so rectangles follow the layout.
    pub fn layout(&mut self, session: &EditorSession) {
        self.rows = session
            .document()
            .blocks()
            .iter()
            .enumerate()
            .map(|(ix, block)| (block.id.clone(), ix))
            .collect();
    }

    /// The user types: the live text changes first, then the host notifies.
    pub fn type_text(&mut self, session: &mut EditorSession, id: &BlockId, text: &str) {
        self.texts.insert(id.clone(), text.to_string());
        self.caret = text.len();
        session.handle_text_changed(self, id, text);
        self.layout(session);
    }

    pub fn press(
        &mut self,
        session: &mut EditorSession,
        id: &BlockId,
        event: impl Into<KeyEvent>,
    ) -> KeyDisposition {
        let disposition = session.handle_key(self, id, event);
        self.layout(session);
        disposition
    }
}

impl EditSurface for MockSurface {
    fn text(&self, id: &BlockId) -> Option<String> {
        self.texts.get(id).cloned()
    }

    fn set_text(&mut self, id: &BlockId, text: &str) {
        self.overwrites += 1;
        self.texts.insert(id.clone(), text.to_string());
    }

    fn caret_offset(&self) -> usize {
        self.caret
    }

    fn block_rect(&self, id: &BlockId) -> Option<Rect> {
        let row = *self.rows.get(id)?;
        Some(Rect::new(48.0, 80.0 + row as f32 * ROW_HEIGHT, 640.0, ROW_HEIGHT))
    }

    fn focus(&mut self, id: &BlockId) {
        self.focused = Some(id.clone());
    }
}
