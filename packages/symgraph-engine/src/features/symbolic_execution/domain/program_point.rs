//! Program point: a position in the CFG, the traversal key of the
//! exploded graph.

use std::fmt;

use crate::shared::models::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramPoint {
    /// Basic block
    pub block: BlockId,
    /// Instruction offset within the block (0-based). An offset equal to the
    /// instruction count denotes the block's outgoing edge position.
    pub offset: u32,
}

impl ProgramPoint {
    pub fn new(block: BlockId, offset: u32) -> Self {
        Self { block, offset }
    }

    pub fn block_start(block: BlockId) -> Self {
        Self::new(block, 0)
    }
}

impl fmt::Display for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}
