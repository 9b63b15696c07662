use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletedList,
    NumberedList,
}

impl BlockType {
    pub fn is_text(&self) -> bool {
        matches!(self, BlockType::Text)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::BulletedList | BlockType::NumberedList)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Heading1 => "heading1",
            BlockType::Heading2 => "heading2",
            BlockType::Heading3 => "heading3",
            BlockType::BulletedList => "bulleted-list",
            BlockType::NumberedList => "numbered-list",
        }
    }

    /// Placeholder shown by the surface while the block is empty.
    pub fn placeholder(&self) -> &'static str {
        match self {
            BlockType::Text => "Type '/' for commands",
            BlockType::BulletedList | BlockType::NumberedList => "List item",
            BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3 => "Heading",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: String,
}

impl Block {
    pub fn new(id: BlockId, block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            id,
            block_type,
            content: strip_line_breaks(&content.into()),
        }
    }
}

/// Blocks never hold line breaks; a break is a block boundary.
pub fn strip_line_breaks(text: &str) -> String {
    text.chars().filter(|ch| *ch != '\n' && *ch != '\r').collect()
}
