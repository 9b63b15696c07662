use crate::blocks::{strip_line_breaks, Block, BlockId, BlockType};
use crate::ids::IdGenerator;

pub const DEFAULT_TITLE: &str = "Untitled";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Removal {
    Refused,
    Removed { focus: Option<BlockId> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Builds a document from stored blocks. An empty list, blank ids and
    /// duplicate ids are repaired so the document invariants hold.
    pub fn new(blocks: Vec<Block>, ids: &mut dyn IdGenerator) -> Self {
        let mut document = Self { blocks: Vec::new() };
        for mut block in blocks {
            if block.id.as_str().is_empty() || document.contains(&block.id) {
                block.id = document.fresh_id(ids);
            }
            block.content = strip_line_breaks(&block.content);
            document.blocks.push(block);
        }
        document.ensure_non_empty(ids);
        document
    }

    pub fn untitled(ids: &mut dyn IdGenerator) -> Self {
        Self {
            blocks: vec![
                Block::new(ids.next(), BlockType::Heading1, DEFAULT_TITLE),
                Block::new(ids.next(), BlockType::Text, ""),
            ],
        }
    }

    /// Next generated id not already taken in this document.
    fn fresh_id(&self, ids: &mut dyn IdGenerator) -> BlockId {
        loop {
            let id = ids.next();
            if !id.as_str().is_empty() && !self.contains(&id) {
                return id;
            }
        }
    }

    fn ensure_non_empty(&mut self, ids: &mut dyn IdGenerator) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::new(ids.next(), BlockType::Text, ""));
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn previous_id(&self, id: &BlockId) -> Option<&BlockId> {
        let ix = self.index_of(id)?;
        let prev = ix.checked_sub(1)?;
        Some(&self.blocks[prev].id)
    }

    pub fn next_id(&self, id: &BlockId) -> Option<&BlockId> {
        let ix = self.index_of(id)?;
        self.blocks.get(ix + 1).map(|block| &block.id)
    }

    pub fn update_block_content(
        &mut self,
        id: &BlockId,
        content: &str,
        new_type: Option<BlockType>,
    ) -> bool {
        let Some(ix) = self.index_of(id) else {
            return false;
        };
        let content = strip_line_breaks(content);
        let block = &mut self.blocks[ix];
        let next_type = new_type.unwrap_or(block.block_type);
        if block.content == content && block.block_type == next_type {
            return false;
        }
        block.content = content;
        block.block_type = next_type;
        true
    }

    pub fn insert_block_after(
        &mut self,
        after: &BlockId,
        ids: &mut dyn IdGenerator,
    ) -> Option<BlockId> {
        self.insert_with_content_after(after, String::new(), ids)
    }

    /// Splits the block at a byte offset; the tail becomes a new block.
    pub fn split_block_at(
        &mut self,
        id: &BlockId,
        mut offset: usize,
        ids: &mut dyn IdGenerator,
    ) -> Option<BlockId> {
        let ix = self.index_of(id)?;
        let text = self.blocks[ix].content.clone();
        offset = offset.min(text.len());
        while offset > 0 && !text.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = text[..offset].to_string();
        let after = text[offset..].to_string();

        self.blocks[ix].content = before;
        self.insert_with_content_after(id, after, ids)
    }

    fn insert_with_content_after(
        &mut self,
        after: &BlockId,
        content: String,
        ids: &mut dyn IdGenerator,
    ) -> Option<BlockId> {
        let ix = self.index_of(after)?;
        let current = self.blocks[ix].block_type;
        let block_type = if current.is_list() {
            current
        } else {
            BlockType::Text
        };
        let id = self.fresh_id(ids);
        self.blocks
            .insert(ix + 1, Block::new(id.clone(), block_type, content));
        Some(id)
    }

    pub fn delete_block(&mut self, id: &BlockId) -> Removal {
        if self.blocks.len() <= 1 {
            return Removal::Refused;
        }
        let Some(ix) = self.index_of(id) else {
            return Removal::Refused;
        };

        self.blocks.remove(ix);
        let focus = ix.checked_sub(1).map(|prev| self.blocks[prev].id.clone());
        Removal::Removed { focus }
    }

    pub fn retype_to_text(&mut self, id: &BlockId) -> bool {
        let Some(ix) = self.index_of(id) else {
            return false;
        };
        let block = &mut self.blocks[ix];
        if block.block_type.is_text() {
            return false;
        }
        block.block_type = BlockType::Text;
        true
    }

    /// 1-based position inside the run of numbered-list blocks ending at `id`.
    pub fn display_number(&self, id: &BlockId) -> Option<usize> {
        let ix = self.index_of(id)?;
        if self.blocks[ix].block_type != BlockType::NumberedList {
            return None;
        }
        let run = self.blocks[..=ix]
            .iter()
            .rev()
            .take_while(|block| block.block_type == BlockType::NumberedList)
            .count();
        Some(run)
    }

    pub fn display_numbers(&self) -> Vec<Option<usize>> {
        let mut counter = 0;
        self.blocks
            .iter()
            .map(|block| {
                if block.block_type == BlockType::NumberedList {
                    counter += 1;
                    Some(counter)
                } else {
                    counter = 0;
                    None
                }
            })
            .collect()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}
