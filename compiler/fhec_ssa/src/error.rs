//! SSA error taxonomy.
//!
//! Build errors abort the (transactional) build; verify errors are
//! collected and reported together so one pass over a broken function
//! surfaces every violation.

use fhec_arena::ArenaError;
use fhec_ir::{NodeHandle, Opcode, Spos};
use fhec_sym::SymHandle;
use thiserror::Error;

use crate::cfg::BlockId;

/// Failure while extracting the CFG or building the SSA form.
///
/// The build is transactional: on any of these the caller receives no
/// SSA form and the container is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SsaBuildError {
    /// The container has no statements, so there is no entry block.
    #[error("container has no statements to build over")]
    EmptyContainer,

    /// A branch names a label that never starts a block, or a
    /// fall-through edge runs off the end of the statement list.
    #[error("branch {branch:?} has no resolvable target")]
    UnresolvedBranchTarget { branch: NodeHandle },

    /// Phi placement failed to reach a fixed point within its safety
    /// bound. Indicates corrupted dominance information.
    #[error("phi placement did not converge after {iterations} iterations")]
    NonTerminatingBuild { iterations: u32 },

    /// A statement carries an opcode the registry does not know.
    #[error("opcode {opcode} is not registered")]
    UnknownOpcode { opcode: Opcode },

    /// A statement or operand handle failed to resolve.
    #[error("dangling reference: {0}")]
    DanglingReference(#[from] ArenaError),
}

/// One SSA invariant violation found by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SsaVerifyError {
    /// A use is not dominated by the definition of the version it
    /// consumes.
    #[error("use at {node:?} ({spos}) of {sym:?} v{version} is not dominated by its definition")]
    DominanceViolation {
        node: NodeHandle,
        sym: SymHandle,
        version: u32,
        spos: Spos,
    },

    /// A phi's operand count differs from its block's predecessor
    /// count, or an operand's definition does not reach its
    /// predecessor.
    #[error("phi for {sym:?} in {block} has {found} operands, expected {expected}")]
    PhiArityMismatch {
        block: BlockId,
        sym: SymHandle,
        expected: usize,
        found: usize,
    },

    /// Two definitions share one `(symbol, version)` pair.
    #[error("{sym:?} v{version} is defined more than once")]
    VersionReuse { sym: SymHandle, version: u32 },

    /// A node or symbol handle recorded in the SSA form no longer
    /// resolves.
    #[error("dangling reference: {0}")]
    DanglingReference(ArenaError),
}
