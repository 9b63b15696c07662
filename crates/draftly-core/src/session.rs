use crate::blocks::BlockId;
use crate::config::EditorConfig;
use crate::document::{Document, Removal};
use crate::focus::FocusCoordinator;
use crate::ids::IdGenerator;
use crate::interpreter::{self, EditCommand};
use crate::menu::{MenuSelection, SlashMenu};
use crate::store::{DocumentStore, StoredDocument};
use crate::surface::{reconcile_block, EditSurface, KeyDisposition, KeyEvent, Point};
use crate::writer::DocumentWriter;
use std::sync::Arc;

/// One open editor: the document plus the ephemeral focus and menu state.
///
/// Every input event goes through [`EditorSession::dispatch`], which mutates
/// the document, updates focus and menu, queues a save and reconciles the
/// surface before returning.
pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    focus: FocusCoordinator,
    menu: SlashMenu,
    ids: Box<dyn IdGenerator>,
    writer: DocumentWriter,
    focus_pending: bool,
}

impl EditorSession {
    pub fn load(
        config: EditorConfig,
        store: Arc<dyn DocumentStore>,
        mut ids: Box<dyn IdGenerator>,
    ) -> std::io::Result<Self> {
        let document = load_document(&config, store.as_ref(), ids.as_mut());
        let writer = DocumentWriter::spawn(store)?;
        Ok(Self {
            config,
            document,
            focus: FocusCoordinator::default(),
            menu: SlashMenu::default(),
            ids,
            writer,
            focus_pending: false,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn focused(&self) -> Option<&BlockId> {
        self.focus.focused()
    }

    pub fn menu(&self) -> &SlashMenu {
        &self.menu
    }

    pub fn display_number(&self, id: &BlockId) -> Option<usize> {
        self.document.display_number(id)
    }

    pub fn handle_key(
        &mut self,
        surface: &mut dyn EditSurface,
        id: &BlockId,
        event: impl Into<KeyEvent>,
    ) -> KeyDisposition {
        let interpretation =
            interpreter::interpret_key(&self.document, &self.menu, &*surface, id, event.into());
        self.dispatch(surface, interpretation.commands);
        interpretation.disposition
    }

    pub fn handle_text_changed(&mut self, surface: &mut dyn EditSurface, id: &BlockId, text: &str) {
        let commands =
            interpreter::interpret_text_change(&self.document, &self.menu, &*surface, id, text);
        self.dispatch(surface, commands);
    }

    /// Pointer press anywhere on the editor. Picks a menu row under the
    /// pointer, or closes the menu when the press lands outside it.
    pub fn handle_pointer_down(&mut self, surface: &mut dyn EditSurface, point: Point) {
        if let Some(index) = self.menu.command_at(point) {
            self.dispatch(surface, vec![EditCommand::MenuChoose { index }]);
        } else if self.menu.pointer_down(point) {
            tracing::debug!("slash menu closed by outside click");
        }
    }

    pub fn choose_command(&mut self, surface: &mut dyn EditSurface, index: usize) {
        self.dispatch(surface, vec![EditCommand::MenuChoose { index }]);
    }

    /// Explicit focus request, e.g. the user clicked into a block.
    pub fn focus_block(&mut self, surface: &mut dyn EditSurface, id: &BlockId) {
        if !self.document.contains(id) {
            return;
        }
        self.set_focus(Some(id.clone()));
        self.render(surface);
    }

    pub fn dispatch(&mut self, surface: &mut dyn EditSurface, commands: Vec<EditCommand>) {
        let mut changed = false;
        for command in commands {
            changed |= self.apply(command);
        }
        if changed {
            self.focus.retain_valid(&self.document);
            self.persist();
        }
        self.render(surface);
    }

    /// Pushes model content to the surface where it diverges and hands over
    /// focus if it moved.
    pub fn render(&mut self, surface: &mut dyn EditSurface) {
        for block in self.document.blocks() {
            reconcile_block(surface, block);
        }
        if self.focus_pending {
            self.focus_pending = false;
            if let Some(id) = self.focus.focused() {
                surface.focus(id);
            }
        }
    }

    /// Blocks until queued saves have reached the store.
    pub fn flush(&self) {
        self.writer.flush();
    }

    pub fn write_failures(&self) -> usize {
        self.writer.failure_count()
    }

    fn apply(&mut self, command: EditCommand) -> bool {
        tracing::debug!(?command, "apply edit command");
        match command {
            EditCommand::UpdateContent {
                id,
                content,
                new_type,
            } => self.document.update_block_content(&id, &content, new_type),
            EditCommand::InsertAfter { id } => {
                let inserted = self.document.insert_block_after(&id, self.ids.as_mut());
                self.focus_inserted(inserted)
            }
            EditCommand::SplitAt { id, offset } => {
                let inserted = self.document.split_block_at(&id, offset, self.ids.as_mut());
                self.focus_inserted(inserted)
            }
            EditCommand::Delete { id } => match self.document.delete_block(&id) {
                Removal::Refused => false,
                Removal::Removed { focus } => {
                    if self.menu.is_open_for(&id) {
                        self.menu.close();
                    }
                    self.set_focus(focus);
                    true
                }
            },
            EditCommand::RetypeToText { id } => self.document.retype_to_text(&id),
            EditCommand::FocusPrevious { id } => {
                if self.focus.focus_previous(&self.document, &id) {
                    self.focus_pending = true;
                }
                false
            }
            EditCommand::FocusNext { id } => {
                if self.focus.focus_next(&self.document, &id) {
                    self.focus_pending = true;
                }
                false
            }
            EditCommand::OpenMenu { id, anchor } => {
                self.menu.open(id, anchor);
                false
            }
            EditCommand::CloseMenu => {
                self.menu.close();
                false
            }
            EditCommand::MenuUp => {
                self.menu.move_up();
                false
            }
            EditCommand::MenuDown => {
                self.menu.move_down();
                false
            }
            EditCommand::MenuConfirm => {
                let selection = self.menu.confirm();
                self.apply_selection(selection)
            }
            EditCommand::MenuChoose { index } => {
                let selection = self.menu.choose(index);
                self.apply_selection(selection)
            }
        }
    }

    fn focus_inserted(&mut self, inserted: Option<BlockId>) -> bool {
        match inserted {
            Some(id) => {
                self.set_focus(Some(id));
                true
            }
            None => false,
        }
    }

    fn apply_selection(&mut self, selection: Option<MenuSelection>) -> bool {
        let Some(selection) = selection else {
            return false;
        };
        let changed =
            self.document
                .update_block_content(&selection.block_id, "", Some(selection.block_type));
        if self.document.contains(&selection.block_id) {
            self.set_focus(Some(selection.block_id));
        }
        changed
    }

    fn set_focus(&mut self, id: Option<BlockId>) {
        self.focus.set(id);
        self.focus_pending = true;
    }

    fn persist(&self) {
        let snapshot = StoredDocument::new(
            self.config.document_id.clone(),
            self.document.blocks().to_vec(),
        );
        self.writer.enqueue(&self.config.store_name, snapshot);
    }
}

fn load_document(
    config: &EditorConfig,
    store: &dyn DocumentStore,
    ids: &mut dyn IdGenerator,
) -> Document {
    match store.get(&config.store_name, &config.document_id) {
        Ok(Some(stored)) if !stored.content.is_empty() => {
            tracing::debug!(blocks = stored.content.len(), "loaded editor document");
            Document::new(stored.content, ids)
        }
        Ok(_) => Document::untitled(ids),
        Err(err) => {
            tracing::warn!(
                store = %config.store_name,
                id = %config.document_id,
                error = ?err,
                "failed to load editor document, starting from default"
            );
            Document::untitled(ids)
        }
    }
}
