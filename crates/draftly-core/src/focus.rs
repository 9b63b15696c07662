use crate::blocks::BlockId;
use crate::document::Document;

/// Tracks the single block that owns input focus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusCoordinator {
    focused: Option<BlockId>,
}

impl FocusCoordinator {
    pub fn focused(&self) -> Option<&BlockId> {
        self.focused.as_ref()
    }

    pub fn is_focused(&self, id: &BlockId) -> bool {
        self.focused.as_ref() == Some(id)
    }

    pub fn set(&mut self, id: Option<BlockId>) {
        self.focused = id;
    }

    pub fn focus(&mut self, id: BlockId) {
        self.focused = Some(id);
    }

    pub fn clear(&mut self) {
        self.focused = None;
    }

    /// Moves focus to the block before `from`; stays put at the first block.
    pub fn focus_previous(&mut self, document: &Document, from: &BlockId) -> bool {
        match document.previous_id(from) {
            Some(prev) => {
                self.focused = Some(prev.clone());
                true
            }
            None => false,
        }
    }

    pub fn focus_next(&mut self, document: &Document, from: &BlockId) -> bool {
        match document.next_id(from) {
            Some(next) => {
                self.focused = Some(next.clone());
                true
            }
            None => false,
        }
    }

    /// Drops a focus id that no longer names a block in `document`.
    pub fn retain_valid(&mut self, document: &Document) {
        if self
            .focused
            .as_ref()
            .is_some_and(|id| !document.contains(id))
        {
            self.focused = None;
        }
    }
}
