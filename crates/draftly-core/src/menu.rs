use crate::blocks::{BlockId, BlockType};
use crate::surface::{Point, Rect};

pub const MENU_OFFSET_Y: f32 = 24.0;
pub const MENU_WIDTH: f32 = 220.0;
pub const MENU_ROW_HEIGHT: f32 = 32.0;
pub const MENU_PADDING: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlashCommandDef {
    pub label: &'static str,
    pub icon: &'static str,
    pub block_type: BlockType,
}

pub const SLASH_COMMANDS: &[SlashCommandDef] = &[
    SlashCommandDef {
        label: "Text",
        icon: "T",
        block_type: BlockType::Text,
    },
    SlashCommandDef {
        label: "Heading 1",
        icon: "H1",
        block_type: BlockType::Heading1,
    },
    SlashCommandDef {
        label: "Heading 2",
        icon: "H2",
        block_type: BlockType::Heading2,
    },
    SlashCommandDef {
        label: "Heading 3",
        icon: "H3",
        block_type: BlockType::Heading3,
    },
    SlashCommandDef {
        label: "Bulleted List",
        icon: "•",
        block_type: BlockType::BulletedList,
    },
    SlashCommandDef {
        label: "Numbered List",
        icon: "1.",
        block_type: BlockType::NumberedList,
    },
];

/// A confirmed menu choice: retype `block_id` to `block_type` and clear it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuSelection {
    pub block_id: BlockId,
    pub block_type: BlockType,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SlashMenu {
    #[default]
    Closed,
    Open {
        anchor: Rect,
        block_id: BlockId,
        selected_index: usize,
    },
}

impl SlashMenu {
    pub fn is_open(&self) -> bool {
        matches!(self, SlashMenu::Open { .. })
    }

    pub fn is_open_for(&self, id: &BlockId) -> bool {
        matches!(self, SlashMenu::Open { block_id, .. } if block_id == id)
    }

    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            SlashMenu::Open { block_id, .. } => Some(block_id),
            SlashMenu::Closed => None,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self {
            SlashMenu::Open { selected_index, .. } => Some(*selected_index),
            SlashMenu::Closed => None,
        }
    }

    pub fn selected_command(&self) -> Option<&'static SlashCommandDef> {
        self.selected_index().and_then(|ix| SLASH_COMMANDS.get(ix))
    }

    pub fn open(&mut self, block_id: BlockId, anchor: Rect) {
        *self = SlashMenu::Open {
            anchor,
            block_id,
            selected_index: 0,
        };
    }

    pub fn close(&mut self) {
        *self = SlashMenu::Closed;
    }

    pub fn move_up(&mut self) {
        if let SlashMenu::Open { selected_index, .. } = self {
            *selected_index = selected_index.saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if let SlashMenu::Open { selected_index, .. } = self {
            let last = SLASH_COMMANDS.len().saturating_sub(1);
            *selected_index = (*selected_index + 1).min(last);
        }
    }

    /// Enter: closes the menu and yields the highlighted command.
    pub fn confirm(&mut self) -> Option<MenuSelection> {
        let index = self.selected_index()?;
        self.choose(index)
    }

    /// Direct click on a command row.
    pub fn choose(&mut self, index: usize) -> Option<MenuSelection> {
        let command = SLASH_COMMANDS.get(index)?;
        let block_id = self.block_id()?.clone();
        self.close();
        Some(MenuSelection {
            block_id,
            block_type: command.block_type,
        })
    }

    /// Rendered menu bounds, laid out just below the anchor block.
    pub fn region(&self) -> Option<Rect> {
        let SlashMenu::Open { anchor, .. } = self else {
            return None;
        };
        let height = MENU_PADDING * 2.0 + MENU_ROW_HEIGHT * SLASH_COMMANDS.len() as f32;
        Some(Rect::new(
            anchor.left,
            anchor.bottom() + MENU_OFFSET_Y,
            MENU_WIDTH,
            height,
        ))
    }

    /// Index of the command row under `point`, if any.
    pub fn command_at(&self, point: Point) -> Option<usize> {
        let region = self.region()?;
        if !region.contains(point) {
            return None;
        }
        let offset = point.y - region.top - MENU_PADDING;
        if offset < 0.0 {
            return None;
        }
        let ix = (offset / MENU_ROW_HEIGHT) as usize;
        (ix < SLASH_COMMANDS.len()).then_some(ix)
    }

    /// Pointer-down anywhere outside the rendered menu closes it.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        match self.region() {
            Some(region) if !region.contains(point) => {
                self.close();
                true
            }
            _ => false,
        }
    }
}
