use crate::blocks::{BlockId, BlockType};
use crate::document::Document;
use crate::menu::SlashMenu;
use crate::surface::{EditSurface, Key, KeyDisposition, KeyEvent, Modifiers, Rect};

pub const SLASH_TRIGGER: &str = "/";

const SHORTCUTS: &[(&str, BlockType)] = &[
    ("- ", BlockType::BulletedList),
    ("* ", BlockType::BulletedList),
    ("1. ", BlockType::NumberedList),
];

#[derive(Clone, Debug, PartialEq)]
pub enum EditCommand {
    UpdateContent {
        id: BlockId,
        content: String,
        new_type: Option<BlockType>,
    },
    InsertAfter {
        id: BlockId,
    },
    SplitAt {
        id: BlockId,
        offset: usize,
    },
    Delete {
        id: BlockId,
    },
    RetypeToText {
        id: BlockId,
    },
    FocusPrevious {
        id: BlockId,
    },
    FocusNext {
        id: BlockId,
    },
    OpenMenu {
        id: BlockId,
        anchor: Rect,
    },
    CloseMenu,
    MenuUp,
    MenuDown,
    MenuConfirm,
    MenuChoose {
        index: usize,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Interpretation {
    pub disposition: KeyDisposition,
    pub commands: Vec<EditCommand>,
}

impl Interpretation {
    fn native() -> Self {
        Self {
            disposition: KeyDisposition::Native,
            commands: Vec::new(),
        }
    }

    fn suppressed(command: EditCommand) -> Self {
        Self {
            disposition: KeyDisposition::Suppressed,
            commands: vec![command],
        }
    }
}

/// Block type a markdown shortcut converts to, matched against the whole text.
pub fn markdown_shortcut(text: &str) -> Option<BlockType> {
    SHORTCUTS
        .iter()
        .find(|(pattern, _)| *pattern == text)
        .map(|(_, block_type)| *block_type)
}

pub fn interpret_key(
    document: &Document,
    menu: &SlashMenu,
    surface: &dyn EditSurface,
    id: &BlockId,
    event: KeyEvent,
) -> Interpretation {
    if menu.is_open() {
        let command = match event.key {
            Key::ArrowUp => Some(EditCommand::MenuUp),
            Key::ArrowDown => Some(EditCommand::MenuDown),
            Key::Enter => Some(EditCommand::MenuConfirm),
            Key::Escape => Some(EditCommand::CloseMenu),
            _ => None,
        };
        if let Some(command) = command {
            return Interpretation::suppressed(command);
        }
    }

    let Some(block) = document.get(id) else {
        return Interpretation::native();
    };
    let id = id.clone();

    match event.key {
        Key::Enter if event.mods.is_empty() => {
            Interpretation::suppressed(EditCommand::InsertAfter { id })
        }
        Key::Enter if event.mods == Modifiers::SHIFT => {
            let offset = surface.caret_offset();
            Interpretation::suppressed(EditCommand::SplitAt { id, offset })
        }
        Key::Backspace if block.content.is_empty() => {
            Interpretation::suppressed(EditCommand::Delete { id })
        }
        Key::Backspace if !block.block_type.is_text() && surface.caret_offset() == 0 => {
            Interpretation::suppressed(EditCommand::RetypeToText { id })
        }
        Key::ArrowUp => Interpretation::suppressed(EditCommand::FocusPrevious { id }),
        Key::ArrowDown => Interpretation::suppressed(EditCommand::FocusNext { id }),
        _ => Interpretation::native(),
    }
}

pub fn interpret_text_change(
    document: &Document,
    menu: &SlashMenu,
    surface: &dyn EditSurface,
    id: &BlockId,
    text: &str,
) -> Vec<EditCommand> {
    let mut commands = Vec::new();
    let Some(block) = document.get(id) else {
        return commands;
    };

    if text == SLASH_TRIGGER {
        let anchor = surface.block_rect(id).unwrap_or_default();
        commands.push(EditCommand::OpenMenu {
            id: id.clone(),
            anchor,
        });
    } else if menu.is_open() {
        commands.push(EditCommand::CloseMenu);
    }

    if block.block_type.is_text() {
        if let Some(block_type) = markdown_shortcut(text) {
            commands.push(EditCommand::UpdateContent {
                id: id.clone(),
                content: String::new(),
                new_type: Some(block_type),
            });
            return commands;
        }
    }

    commands.push(EditCommand::UpdateContent {
        id: id.clone(),
        content: text.to_string(),
        new_type: None,
    });
    commands
}

#[cfg(test)]
mod tests {
    use super::{interpret_key, interpret_text_change, markdown_shortcut, EditCommand};
    use crate::blocks::{Block, BlockId, BlockType};
    use crate::document::Document;
    use crate::ids::SequentialIds;
    use crate::menu::SlashMenu;
    use crate::surface::{EditSurface, Key, KeyDisposition, KeyEvent, Modifiers, Rect};

    struct StubSurface {
        caret: usize,
        rect: Rect,
    }

    impl StubSurface {
        fn at(caret: usize) -> Self {
            Self {
                caret,
                rect: Rect::new(0.0, 10.0, 300.0, 20.0),
            }
        }
    }

    impl EditSurface for StubSurface {
        fn text(&self, _id: &BlockId) -> Option<String> {
            None
        }

        fn set_text(&mut self, _id: &BlockId, _text: &str) {}

        fn caret_offset(&self) -> usize {
            self.caret
        }

        fn block_rect(&self, _id: &BlockId) -> Option<Rect> {
            Some(self.rect)
        }

        fn focus(&mut self, _id: &BlockId) {}
    }

    fn document(block_type: BlockType, content: &str) -> Document {
        let mut ids = SequentialIds::default();
        Document::new(
            vec![
                Block::new(BlockId::new("a"), BlockType::Text, "first"),
                Block::new(BlockId::new("b"), block_type, content),
            ],
            &mut ids,
        )
    }

    fn b() -> BlockId {
        BlockId::new("b")
    }

    #[test]
    fn shortcuts_match_exactly() {
        assert_eq!(markdown_shortcut("- "), Some(BlockType::BulletedList));
        assert_eq!(markdown_shortcut("* "), Some(BlockType::BulletedList));
        assert_eq!(markdown_shortcut("1. "), Some(BlockType::NumberedList));
        assert_eq!(markdown_shortcut("x- "), None);
        assert_eq!(markdown_shortcut("- item"), None);
        assert_eq!(markdown_shortcut("2. "), None);
    }

    #[test]
    fn enter_inserts_after_current() {
        let doc = document(BlockType::Text, "hello");
        let result = interpret_key(
            &doc,
            &SlashMenu::Closed,
            &StubSurface::at(5),
            &b(),
            Key::Enter.into(),
        );
        assert_eq!(result.disposition, KeyDisposition::Suppressed);
        assert_eq!(result.commands, vec![EditCommand::InsertAfter { id: b() }]);
    }

    #[test]
    fn shift_enter_splits_at_caret() {
        let doc = document(BlockType::Text, "hello");
        let result = interpret_key(
            &doc,
            &SlashMenu::Closed,
            &StubSurface::at(2),
            &b(),
            KeyEvent::with_mods(Key::Enter, Modifiers::SHIFT),
        );
        assert_eq!(
            result.commands,
            vec![EditCommand::SplitAt { id: b(), offset: 2 }]
        );
    }

    #[test]
    fn backspace_rules() {
        let empty = document(BlockType::BulletedList, "");
        let result = interpret_key(
            &empty,
            &SlashMenu::Closed,
            &StubSurface::at(0),
            &b(),
            Key::Backspace.into(),
        );
        assert_eq!(result.commands, vec![EditCommand::Delete { id: b() }]);

        let list = document(BlockType::BulletedList, "item");
        let result = interpret_key(
            &list,
            &SlashMenu::Closed,
            &StubSurface::at(0),
            &b(),
            Key::Backspace.into(),
        );
        assert_eq!(result.commands, vec![EditCommand::RetypeToText { id: b() }]);

        let result = interpret_key(
            &list,
            &SlashMenu::Closed,
            &StubSurface::at(2),
            &b(),
            Key::Backspace.into(),
        );
        assert_eq!(result.disposition, KeyDisposition::Native);
        assert!(result.commands.is_empty());

        let text = document(BlockType::Text, "item");
        let result = interpret_key(
            &text,
            &SlashMenu::Closed,
            &StubSurface::at(0),
            &b(),
            Key::Backspace.into(),
        );
        assert_eq!(result.disposition, KeyDisposition::Native);
    }

    #[test]
    fn arrows_move_focus_when_menu_closed() {
        let doc = document(BlockType::Text, "");
        let up = interpret_key(
            &doc,
            &SlashMenu::Closed,
            &StubSurface::at(0),
            &b(),
            Key::ArrowUp.into(),
        );
        assert_eq!(up.commands, vec![EditCommand::FocusPrevious { id: b() }]);
        let down = interpret_key(
            &doc,
            &SlashMenu::Closed,
            &StubSurface::at(0),
            &b(),
            Key::ArrowDown.into(),
        );
        assert_eq!(down.commands, vec![EditCommand::FocusNext { id: b() }]);
    }

    #[test]
    fn open_menu_captures_navigation_keys() {
        let doc = document(BlockType::Text, "/");
        let mut menu = SlashMenu::Closed;
        menu.open(b(), Rect::default());
        let surface = StubSurface::at(1);

        let cases = [
            (Key::ArrowUp, EditCommand::MenuUp),
            (Key::ArrowDown, EditCommand::MenuDown),
            (Key::Enter, EditCommand::MenuConfirm),
            (Key::Escape, EditCommand::CloseMenu),
        ];
        for (key, expected) in cases {
            let result = interpret_key(&doc, &menu, &surface, &b(), key.into());
            assert_eq!(result.disposition, KeyDisposition::Suppressed);
            assert_eq!(result.commands, vec![expected]);
        }

        let other = interpret_key(&doc, &menu, &surface, &b(), Key::Other.into());
        assert_eq!(other.disposition, KeyDisposition::Native);
    }

    #[test]
    fn slash_opens_menu_at_block_rect() {
        let doc = document(BlockType::Text, "");
        let surface = StubSurface::at(1);
        let commands = interpret_text_change(&doc, &SlashMenu::Closed, &surface, &b(), "/");
        assert_eq!(
            commands,
            vec![
                EditCommand::OpenMenu {
                    id: b(),
                    anchor: surface.rect,
                },
                EditCommand::UpdateContent {
                    id: b(),
                    content: "/".into(),
                    new_type: None,
                },
            ]
        );
    }

    #[test]
    fn other_text_closes_open_menu() {
        let doc = document(BlockType::Text, "/");
        let mut menu = SlashMenu::Closed;
        menu.open(b(), Rect::default());
        let commands = interpret_text_change(&doc, &menu, &StubSurface::at(2), &b(), "/h");
        assert_eq!(commands[0], EditCommand::CloseMenu);
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn shortcut_only_applies_to_text_blocks() {
        let doc = document(BlockType::Text, "-");
        let commands =
            interpret_text_change(&doc, &SlashMenu::Closed, &StubSurface::at(2), &b(), "1. ");
        assert_eq!(
            commands,
            vec![EditCommand::UpdateContent {
                id: b(),
                content: String::new(),
                new_type: Some(BlockType::NumberedList),
            }]
        );

        let heading = document(BlockType::Heading2, "-");
        let commands =
            interpret_text_change(&heading, &SlashMenu::Closed, &StubSurface::at(2), &b(), "- ");
        assert_eq!(
            commands,
            vec![EditCommand::UpdateContent {
                id: b(),
                content: "- ".into(),
                new_type: None,
            }]
        );
    }

    #[test]
    fn unknown_block_yields_nothing() {
        let doc = document(BlockType::Text, "");
        let missing = BlockId::new("missing");
        let commands =
            interpret_text_change(&doc, &SlashMenu::Closed, &StubSurface::at(0), &missing, "x");
        assert!(commands.is_empty());
        let result = interpret_key(
            &doc,
            &SlashMenu::Closed,
            &StubSurface::at(0),
            &missing,
            Key::Enter.into(),
        );
        assert_eq!(result.disposition, KeyDisposition::Native);
    }
}
