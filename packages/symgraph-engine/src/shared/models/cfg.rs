//! Control-flow graph contract.
//!
//! The engine consumes this read-only: ordered basic blocks holding flattened
//! instruction sequences, edges optionally labeled `True`/`False`. Blocks are
//! arena-indexed (`BlockId` into a `Vec`), so back-edges are just edges whose
//! target index precedes the source; no cycle detection anywhere.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::instruction::Instruction;
use crate::errors::{EngineError, Result};

/// Index of a basic block in its CFG.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// Branch outcome carried on a conditional edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeLabel {
    True,
    False,
}

/// Directed edge between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub target: BlockId,
    pub label: Option<EdgeLabel>,
}

/// Basic block: a linear instruction sequence plus successor edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    pub instructions: Vec<Instruction>,
    pub successors: Vec<Edge>,
}

/// Read-only control-flow graph of one function body.
///
/// Invariants, validated at build time:
/// - block 0 is the entry block;
/// - every edge target is in range;
/// - a block with labeled successors has exactly one `True` and one `False`
///   edge (a branch block);
/// - at least one block has no successors (an exit block).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    blocks: Vec<Block>,
}

impl ControlFlowGraph {
    pub fn entry(&self) -> BlockId {
        BlockId(0)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks in their stable (arena) order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (BlockId(i as u32), b))
    }

    /// Ids in range are guaranteed by build-time validation.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn successors(&self, id: BlockId) -> &[Edge] {
        &self.blocks[id.index()].successors
    }

    /// A branch block ends in a condition and carries both labeled edges.
    pub fn is_branch(&self, id: BlockId) -> bool {
        self.branch_targets(id).is_some()
    }

    pub fn is_exit(&self, id: BlockId) -> bool {
        self.successors(id).is_empty()
    }

    /// `(true_target, false_target)` for a branch block.
    pub fn branch_targets(&self, id: BlockId) -> Option<(BlockId, BlockId)> {
        let succ = self.successors(id);
        let t = succ.iter().find(|e| e.label == Some(EdgeLabel::True))?;
        let f = succ.iter().find(|e| e.label == Some(EdgeLabel::False))?;
        Some((t.target, f.target))
    }
}

/// Programmatic CFG construction, standing in for the front end.
///
/// The engine never mutates a built graph; this type exists so explorations
/// (and tests) can be driven without a parser.
#[derive(Debug, Default)]
pub struct CfgBuilder {
    blocks: Vec<Block>,
}

impl CfgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty block and returns its id. The first block added is
    /// the entry block.
    pub fn block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block::default());
        id
    }

    pub fn push(&mut self, block: BlockId, instruction: Instruction) -> &mut Self {
        self.blocks[block.index()].instructions.push(instruction);
        self
    }

    pub fn push_all<I>(&mut self, block: BlockId, instructions: I) -> &mut Self
    where
        I: IntoIterator<Item = Instruction>,
    {
        self.blocks[block.index()]
            .instructions
            .extend(instructions);
        self
    }

    /// Unconditional edge.
    pub fn edge(&mut self, from: BlockId, to: BlockId) -> &mut Self {
        self.blocks[from.index()].successors.push(Edge {
            target: to,
            label: None,
        });
        self
    }

    /// Turns `from` into a branch block with the two labeled edges.
    pub fn branch(&mut self, from: BlockId, on_true: BlockId, on_false: BlockId) -> &mut Self {
        let succ = &mut self.blocks[from.index()].successors;
        succ.push(Edge {
            target: on_true,
            label: Some(EdgeLabel::True),
        });
        succ.push(Edge {
            target: on_false,
            label: Some(EdgeLabel::False),
        });
        self
    }

    pub fn build(self) -> Result<ControlFlowGraph> {
        if self.blocks.is_empty() {
            return Err(EngineError::malformed_cfg("graph has no entry block"));
        }
        let count = self.blocks.len();
        for (i, block) in self.blocks.iter().enumerate() {
            let labeled = block
                .successors
                .iter()
                .filter(|e| e.label.is_some())
                .count();
            if labeled > 0 {
                let has_true = block
                    .successors
                    .iter()
                    .any(|e| e.label == Some(EdgeLabel::True));
                let has_false = block
                    .successors
                    .iter()
                    .any(|e| e.label == Some(EdgeLabel::False));
                if labeled != 2 || !has_true || !has_false {
                    return Err(EngineError::malformed_cfg(format!(
                        "block B{i} must carry exactly one true and one false edge"
                    )));
                }
            }
            for edge in &block.successors {
                if edge.target.index() >= count {
                    return Err(EngineError::malformed_cfg(format!(
                        "block B{i} has an edge to missing {}",
                        edge.target
                    )));
                }
            }
        }
        if !self.blocks.iter().any(|b| b.successors.is_empty()) {
            return Err(EngineError::malformed_cfg("graph has no exit block"));
        }
        Ok(ControlFlowGraph {
            blocks: self.blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::instruction::LiteralValue;

    #[test]
    fn straight_line_graph() {
        let mut b = CfgBuilder::new();
        let entry = b.block();
        let exit = b.block();
        b.push(entry, Instruction::Literal(LiteralValue::True));
        b.edge(entry, exit);
        let cfg = b.build().unwrap();

        assert_eq!(cfg.entry(), entry);
        assert!(!cfg.is_exit(entry));
        assert!(cfg.is_exit(exit));
        assert!(!cfg.is_branch(entry));
        assert_eq!(cfg.block(entry).instructions.len(), 1);
    }

    #[test]
    fn branch_block_targets() {
        let mut b = CfgBuilder::new();
        let entry = b.block();
        let then = b.block();
        let other = b.block();
        let exit = b.block();
        b.branch(entry, then, other);
        b.edge(then, exit);
        b.edge(other, exit);
        let cfg = b.build().unwrap();

        assert!(cfg.is_branch(entry));
        assert_eq!(cfg.branch_targets(entry), Some((then, other)));
    }

    #[test]
    fn survives_json_round_trip() {
        let mut b = CfgBuilder::new();
        let entry = b.block();
        let then = b.block();
        let other = b.block();
        b.push(entry, Instruction::Literal(LiteralValue::False));
        b.branch(entry, then, other);
        let cfg = b.build().unwrap();

        let json = serde_json::to_string(&cfg).unwrap();
        let back: ControlFlowGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.block_count(), cfg.block_count());
        assert_eq!(back.branch_targets(entry), Some((then, other)));
        assert_eq!(back.block(entry).instructions, cfg.block(entry).instructions);
    }

    #[test]
    fn rejects_dangling_edge() {
        let mut b = CfgBuilder::new();
        let entry = b.block();
        b.edge(entry, BlockId(9));
        assert!(b.build().is_err());
    }

    #[test]
    fn rejects_half_labeled_branch() {
        let mut b = CfgBuilder::new();
        let entry = b.block();
        let t = b.block();
        b.blocks[entry.index()].successors.push(Edge {
            target: t,
            label: Some(EdgeLabel::True),
        });
        assert!(b.build().is_err());
    }

    #[test]
    fn rejects_exitless_graph() {
        let mut b = CfgBuilder::new();
        let only = b.block();
        b.edge(only, only);
        assert!(b.build().is_err());
    }
}
