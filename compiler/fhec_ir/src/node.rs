//! IR nodes.

use fhec_arena::Handle;
use fhec_sym::{ConstData, ConstHandle, SymHandle, TypeHandle};
use smallvec::SmallVec;

use crate::opcode::Opcode;
use crate::registry::OperandKind;
use crate::spos::Spos;

/// Handle to a node in a container's node arena.
pub type NodeHandle = Handle<NodeData>;

/// A typed operand.
///
/// Operands reference arena objects by handle; the variant must match
/// the [`OperandKind`] the opcode's registry entry declares for the
/// slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// A value-producing node in the same container.
    Node(NodeHandle),
    /// A symbol.
    Sym(SymHandle),
    /// A label node (branch target) in the same container.
    Label(NodeHandle),
    /// A constant.
    Const(ConstHandle),
}

impl Operand {
    /// The kind this operand satisfies.
    pub fn kind(self) -> OperandKind {
        match self {
            Operand::Node(_) => OperandKind::Value,
            Operand::Sym(_) => OperandKind::Sym,
            Operand::Label(_) => OperandKind::Label,
            Operand::Const(_) => OperandKind::Const,
        }
    }

    /// The node handle inside, for `Node` and `Label` operands.
    pub fn as_node(self) -> Option<NodeHandle> {
        match self {
            Operand::Node(h) | Operand::Label(h) => Some(h),
            _ => None,
        }
    }

    /// The constant handle inside, if this is a `Const` operand.
    pub fn as_const(self) -> Option<Handle<ConstData>> {
        match self {
            Operand::Const(h) => Some(h),
            _ => None,
        }
    }
}

/// One IR node.
///
/// Arity and operand kinds were validated against the opcode registry
/// at construction; consumers may rely on the contract holding.
#[derive(Clone, Debug)]
pub struct NodeData {
    pub opcode: Opcode,
    pub operands: SmallVec<[Operand; 2]>,
    /// Result type. For `ResultRule::Void` opcodes this is the unit the
    /// caller supplied and carries no meaning.
    pub ty: TypeHandle,
    /// Referenced symbol, present iff the opcode has `HAS_SYM`.
    pub sym: Option<SymHandle>,
    pub spos: Spos,
}

impl NodeData {
    /// Operands that are nodes in the same container (`Node` and
    /// `Label` variants).
    pub fn node_operands(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.operands.iter().filter_map(|op| op.as_node())
    }

    /// Label operands, in slot order.
    pub fn label_targets(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.operands.iter().filter_map(|op| match op {
            Operand::Label(h) => Some(*h),
            _ => None,
        })
    }
}
