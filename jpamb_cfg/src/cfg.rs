use crate::{Block, BlockId, NodeRef};
use jpamb_opcode::MethodId;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The control-flow graph of a single method (§3 CFG): an arena of basic
/// blocks indexed by start offset, plus any continuation nodes (in other
/// methods' CFGs) still waiting on this method to finish building (§4.3
/// Interprocedural edges).
#[derive(Debug, Clone)]
pub struct Cfg {
    pub method: Arc<MethodId>,
    pub entry: BlockId,
    blocks: Vec<Block>,
    by_offset_start: BTreeMap<usize, BlockId>,
    pub(crate) pending_continuations: Vec<NodeRef>,
    pub(crate) building: bool,
}

impl Cfg {
    pub(crate) fn new(method: Arc<MethodId>) -> Self {
        Cfg {
            method,
            entry: BlockId(0),
            blocks: Vec::new(),
            by_offset_start: BTreeMap::new(),
            pending_continuations: Vec::new(),
            building: true,
        }
    }

    #[must_use]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0]
    }

    #[must_use]
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().enumerate().map(|(i, b)| (BlockId(i), b))
    }

    /// Looks up the block whose `offset_start` exactly matches `offset`.
    #[must_use]
    pub fn block_at(&self, offset: usize) -> Option<BlockId> {
        self.by_offset_start.get(&offset).copied()
    }

    /// Finds the block whose `[offset_start, offset_end]` range contains
    /// `offset`, used to resolve a backward jump into the middle of an
    /// already-built block (§4.3 Back-edges).
    #[must_use]
    pub fn block_containing(&self, offset: usize) -> Option<BlockId> {
        self.by_offset_start
            .range(..=offset)
            .next_back()
            .map(|(_, &id)| id)
            .filter(|&id| offset <= self.block(id).offset_end)
    }

    /// Follows a chain of `split_child` pointers to the block that actually
    /// owns the offsets originally assigned to `id` (§9 `active_tail`).
    #[must_use]
    pub fn active_tail(&self, id: BlockId) -> BlockId {
        let mut current = id;
        while let Some(child) = self.block(current).split_child {
            current = child;
        }
        current
    }

    /// All blocks whose terminator is a `Return` opcode (§4.3 Interprocedural
    /// edges).
    #[must_use]
    pub fn return_blocks(&self) -> Vec<BlockId> {
        self.blocks()
            .filter(|(_, block)| block.is_return())
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the existing block starting at `offset_start`, extending its
    /// recorded end if `offset_end` is larger, or creates a fresh one.
    /// Mirrors the original `add_node` merge-by-start-offset behavior.
    pub(crate) fn get_or_add_block(&mut self, offset_start: usize, offset_end: usize) -> BlockId {
        if let Some(&id) = self.by_offset_start.get(&offset_start) {
            let block = self.block_mut(id);
            if offset_end > block.offset_end {
                block.offset_end = offset_end;
            }
            id
        } else {
            let id = BlockId(self.blocks.len());
            self.by_offset_start.insert(offset_start, id);
            self.blocks.push(Block::new(offset_start, offset_end));
            id
        }
    }

    /// The coverage-disjointness invariant (§3, §8): the ranges of blocks
    /// that are not themselves the truncated half of a split must be
    /// pairwise disjoint.
    #[must_use]
    pub fn ranges_are_disjoint(&self) -> bool {
        let mut ranges: Vec<(usize, usize)> = self
            .blocks()
            .filter(|(_, b)| b.split_child.is_none())
            .map(|(_, b)| (b.offset_start, b.offset_end))
            .collect();
        ranges.sort_unstable();
        ranges.windows(2).all(|w| w[0].1 < w[1].0)
    }
}
