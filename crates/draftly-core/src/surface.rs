use crate::blocks::{Block, BlockId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    ArrowUp,
    ArrowDown,
    Escape,
    /// Any key the core does not interpret (printable characters, arrows
    /// left/right, tab, ...).
    Other,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::empty(),
        }
    }

    pub fn with_mods(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::plain(key)
    }
}

/// What the host should do with the key after the core has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Let the surface apply its default behaviour.
    Native,
    /// The core consumed the key; suppress the default.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle in surface coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }
}

/// Boundary between the editor core and whatever renders the blocks.
///
/// Hosts translate their platform key events into [`KeyEvent`] and forward
/// text-changed notifications with the block's full live text. The core reads
/// the caret offset and block rectangles back through this trait.
pub trait EditSurface {
    /// Live text currently shown for the block, if it is mounted.
    fn text(&self, id: &BlockId) -> Option<String>;
    fn set_text(&mut self, id: &BlockId, text: &str);
    /// Byte offset of the caret inside the focused block.
    fn caret_offset(&self) -> usize;
    fn block_rect(&self, id: &BlockId) -> Option<Rect>;
    fn focus(&mut self, id: &BlockId);
}

/// Writes `block.content` to the surface only when the live text diverges.
///
/// Returns true when the surface was overwritten.
pub fn reconcile_block(surface: &mut dyn EditSurface, block: &Block) -> bool {
    match surface.text(&block.id) {
        Some(live) if live == block.content => false,
        _ => {
            surface.set_text(&block.id, &block.content);
            true
        }
    }
}
