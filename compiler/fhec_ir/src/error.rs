//! IR construction and dispatch errors.

use fhec_arena::ArenaError;
use thiserror::Error;

use crate::opcode::Opcode;
use crate::registry::{Arity, OperandKind};

/// Errors raised while building or dispatching over IR.
///
/// Construction errors are raised *before* the node is linked into the
/// container, so a failed construction never corrupts visible state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    /// Operand count violates the opcode's arity contract.
    #[error("{opcode}: arity mismatch, expected {expected:?}, found {found} operands")]
    ArityMismatch {
        opcode: Opcode,
        expected: Arity,
        found: usize,
    },

    /// An operand slot holds the wrong kind of handle.
    #[error("{opcode}: operand {index} must be {expected:?}, found {found:?}")]
    OperandKindMismatch {
        opcode: Opcode,
        index: usize,
        expected: OperandKind,
        found: OperandKind,
    },

    /// The opcode requires a symbol reference and none was supplied.
    #[error("{opcode}: missing required symbol reference")]
    MissingSymbolRef { opcode: Opcode },

    /// An operand handle does not resolve (stale or foreign).
    #[error("dangling reference: {0}")]
    DanglingReference(#[from] ArenaError),

    /// The opcode is not present in the registry.
    #[error("unknown opcode {opcode}")]
    UnknownOpcode { opcode: Opcode },

    /// Dispatch reached an `Invalid` handler entry: this opcode must
    /// never appear in the running pass.
    #[error("unexpected opcode {opcode} for this pass")]
    UnexpectedOpcode { opcode: Opcode },

    /// A domain id was registered twice.
    #[error("domain {id} already registered")]
    DuplicateDomain { id: u8 },

    /// An opcode was registered twice.
    #[error("opcode {opcode} already registered")]
    DuplicateOpcode { opcode: Opcode },

    /// A domain's opcode table contains an entry for another domain.
    #[error("opcode table for domain {domain} contains foreign entry {opcode}")]
    ForeignDomainEntry { domain: u8, opcode: Opcode },
}
