use crate::blocks::BlockId;
use uuid::Uuid;

/// Source of fresh block ids. Ids are never reused within a process.
pub trait IdGenerator {
    fn next(&mut self) -> BlockId;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next(&mut self) -> BlockId {
        BlockId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic ids (`<prefix>-1`, `<prefix>-2`, ...) for tests and fixtures.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    counter: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("block")
    }
}

impl IdGenerator for SequentialIds {
    fn next(&mut self) -> BlockId {
        self.counter += 1;
        BlockId::new(format!("{}-{}", self.prefix, self.counter))
    }
}
