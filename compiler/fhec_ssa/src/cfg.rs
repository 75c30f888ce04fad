//! Control-flow graph extraction.
//!
//! Blocks are formed from the container's statement list using the
//! registry's `BEGIN_BB`, `END_BB`, and `FALLTHROUGH` properties, so
//! any domain can participate in control flow by declaring them.
//! Successor edges come from label operands of block-ending nodes plus
//! the fall-through edge; predecessors are derived and stored in
//! canonical order (ascending leading statement handle), which fixes
//! phi operand order for the whole SSA pipeline.

use std::fmt;

use fhec_ir::{Container, NodeHandle, OpcodeProps, OpcodeRegistry};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::SsaBuildError;

/// Index of a basic block within its [`Cfg`].
///
/// Blocks are numbered in statement-list order, so ascending `BlockId`
/// is also ascending leading statement handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(u32);

impl BlockId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(u32::try_from(index).is_ok());
        Self(index as u32)
    }

    /// Index into [`Cfg::blocks`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// One basic block: a maximal straight-line run of statements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// All statements of the block in execution order, including the
    /// leading label (if any) and the terminator (if any).
    pub stmts: Vec<NodeHandle>,
    /// Successors in edge order: label targets first, then the
    /// fall-through edge.
    pub succs: SmallVec<[BlockId; 2]>,
    /// Predecessors in canonical order (ascending leading statement
    /// handle). Phi operands are slot-for-slot aligned with this list.
    pub preds: SmallVec<[BlockId; 2]>,
}

impl Block {
    /// The leading statement; defines the block's canonical position.
    pub fn first(&self) -> NodeHandle {
        // Blocks are never constructed empty.
        self.stmts[0]
    }
}

/// The control-flow graph of one container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cfg {
    blocks: Vec<Block>,
    entry: BlockId,
}

impl Cfg {
    /// Partition the container's statement list into basic blocks and
    /// wire up edges.
    ///
    /// A statement with `BEGIN_BB` starts a new block; a statement with
    /// `END_BB` ends the current one. A block-ending statement
    /// contributes one successor per label operand, plus the next block
    /// in statement order when it carries `FALLTHROUGH`. A block that
    /// simply runs into a label falls through implicitly.
    pub fn build(cont: &Container, reg: &OpcodeRegistry) -> Result<Self, SsaBuildError> {
        if cont.code().is_empty() {
            return Err(SsaBuildError::EmptyContainer);
        }

        // Pass 1: block boundaries, and the label-to-block map for edge
        // resolution.
        let mut blocks: Vec<Block> = Vec::new();
        let mut current: Vec<NodeHandle> = Vec::new();
        let mut label_block: FxHashMap<NodeHandle, BlockId> = FxHashMap::default();

        for &h in cont.code() {
            let node = cont.node(h)?;
            let info = reg
                .info(node.opcode)
                .ok_or(SsaBuildError::UnknownOpcode {
                    opcode: node.opcode,
                })?;

            if info.props.contains(OpcodeProps::BEGIN_BB) {
                if !current.is_empty() {
                    blocks.push(Block {
                        stmts: std::mem::take(&mut current),
                        succs: SmallVec::new(),
                        preds: SmallVec::new(),
                    });
                }
                label_block.insert(h, BlockId::new(blocks.len()));
            }
            current.push(h);
            if info.props.contains(OpcodeProps::END_BB) {
                blocks.push(Block {
                    stmts: std::mem::take(&mut current),
                    succs: SmallVec::new(),
                    preds: SmallVec::new(),
                });
            }
        }
        if !current.is_empty() {
            blocks.push(Block {
                stmts: current,
                succs: SmallVec::new(),
                preds: SmallVec::new(),
            });
        }

        // Pass 2: successor edges from each block's terminator.
        let num = blocks.len();
        for i in 0..num {
            let Some(&last) = blocks[i].stmts.last() else {
                continue;
            };
            let node = cont.node(last)?;
            let info = reg
                .info(node.opcode)
                .ok_or(SsaBuildError::UnknownOpcode {
                    opcode: node.opcode,
                })?;

            let mut succs: SmallVec<[BlockId; 2]> = SmallVec::new();
            if info.props.contains(OpcodeProps::END_BB) {
                for target in node.label_targets() {
                    let id = *label_block
                        .get(&target)
                        .ok_or(SsaBuildError::UnresolvedBranchTarget { branch: last })?;
                    succs.push(id);
                }
                if info.props.contains(OpcodeProps::FALLTHROUGH) {
                    if i + 1 >= num {
                        return Err(SsaBuildError::UnresolvedBranchTarget { branch: last });
                    }
                    succs.push(BlockId::new(i + 1));
                }
            } else if i + 1 < num {
                // Ran into the next block's label.
                succs.push(BlockId::new(i + 1));
            }
            // Parallel edges (e.g. a conditional branch to its own
            // fall-through block) collapse to one.
            let mut seen: SmallVec<[BlockId; 2]> = SmallVec::new();
            succs.retain(|s| {
                if seen.contains(s) {
                    false
                } else {
                    seen.push(*s);
                    true
                }
            });
            blocks[i].succs = succs;
        }

        // Derive predecessors, canonically ordered. BlockIds follow
        // statement order, so ascending id is ascending leading handle.
        for i in 0..num {
            let succs = blocks[i].succs.clone();
            for s in succs {
                blocks[s.index()].preds.push(BlockId::new(i));
            }
        }
        for block in &mut blocks {
            block.preds.sort_unstable();
        }

        Ok(Self {
            blocks,
            entry: BlockId::new(0),
        })
    }

    /// The entry block (first in statement order).
    pub fn entry(&self) -> BlockId {
        self.entry
    }

    /// Number of blocks.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Resolve a block id.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// All blocks in canonical (statement) order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block ids in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.blocks.len()).map(BlockId::new)
    }
}
