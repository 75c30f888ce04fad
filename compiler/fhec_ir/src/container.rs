//! Per-function IR container.

use std::fmt::Write as _;

use fhec_arena::{Arena, ArenaError, ArenaKind};
use fhec_sym::{Name, ScopeId, SymbolTable};

use crate::error::IrError;
use crate::node::{NodeData, NodeHandle, Operand};
use crate::opcode::Opcode;
use crate::registry::{Arity, OpcodeProps, OpcodeRegistry};
use crate::spos::Spos;

/// One container per compilation unit/function.
///
/// Owns the node arena, the statement list (nodes in execution order),
/// the entry node, and the function's local scope. The container is the
/// unit SSA construction operates on; the SSA form lives beside it as a
/// side structure so non-SSA consumers stay valid.
pub struct Container {
    name: Name,
    scope: ScopeId,
    nodes: Arena<NodeData>,
    code: Vec<NodeHandle>,
    entry: Option<NodeHandle>,
}

impl Container {
    /// Create an empty container for function `name` with local scope
    /// `scope`.
    pub fn new(name: Name, scope: ScopeId) -> Self {
        Self {
            name,
            scope,
            nodes: Arena::new(ArenaKind::Node),
            code: Vec::new(),
            entry: None,
        }
    }

    /// Function name.
    pub fn name(&self) -> Name {
        self.name
    }

    /// The function's local scope.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// The entry node, once one has been created.
    pub fn entry(&self) -> Option<NodeHandle> {
        self.entry
    }

    /// Statement list in execution order.
    pub fn code(&self) -> &[NodeHandle] {
        &self.code
    }

    /// Number of allocated nodes (linked or not).
    pub fn num_nodes(&self) -> u32 {
        self.nodes.len()
    }

    /// Create a node after validating it against the registry.
    ///
    /// Validation covers arity, per-slot operand kinds, resolvability of
    /// node/label operands against this container, and the presence of a
    /// symbol reference when the opcode demands one. On any failure the
    /// node is never allocated, so no half-built node is reachable.
    pub fn new_node(
        &mut self,
        reg: &OpcodeRegistry,
        opcode: Opcode,
        operands: &[Operand],
        ty: fhec_sym::TypeHandle,
        sym: Option<fhec_sym::SymHandle>,
        spos: Spos,
    ) -> Result<NodeHandle, IrError> {
        let info = reg.info(opcode).ok_or(IrError::UnknownOpcode { opcode })?;

        match info.arity {
            Arity::Fixed(n) => {
                if operands.len() != n as usize {
                    return Err(IrError::ArityMismatch {
                        opcode,
                        expected: info.arity,
                        found: operands.len(),
                    });
                }
            }
            Arity::Variadic { min } => {
                if operands.len() < min as usize {
                    return Err(IrError::ArityMismatch {
                        opcode,
                        expected: info.arity,
                        found: operands.len(),
                    });
                }
            }
        }

        for (index, op) in operands.iter().enumerate() {
            let Some(expected) = info.operand_kind(index) else {
                return Err(IrError::ArityMismatch {
                    opcode,
                    expected: info.arity,
                    found: operands.len(),
                });
            };
            if op.kind() != expected {
                return Err(IrError::OperandKindMismatch {
                    opcode,
                    index,
                    expected,
                    found: op.kind(),
                });
            }
            // Node and label operands must already live in this
            // container; symbol/constant handles are checked by the
            // verifier, which has the owning tables in hand.
            if let Some(h) = op.as_node() {
                self.nodes.get(h)?;
            }
        }

        if info.props.contains(OpcodeProps::HAS_SYM) && sym.is_none() {
            return Err(IrError::MissingSymbolRef { opcode });
        }

        let handle = self.nodes.alloc(NodeData {
            opcode,
            operands: operands.iter().copied().collect(),
            ty,
            sym,
            spos,
        });

        if info.props.contains(OpcodeProps::ENTRY) && self.entry.is_none() {
            self.entry = Some(handle);
        }

        Ok(handle)
    }

    /// Link an already-created node into the statement list.
    pub fn append(&mut self, handle: NodeHandle) -> Result<(), IrError> {
        self.nodes.get(handle)?;
        self.code.push(handle);
        Ok(())
    }

    /// Create a node and link it as the next statement.
    #[allow(clippy::too_many_arguments)]
    pub fn append_node(
        &mut self,
        reg: &OpcodeRegistry,
        opcode: Opcode,
        operands: &[Operand],
        ty: fhec_sym::TypeHandle,
        sym: Option<fhec_sym::SymHandle>,
        spos: Spos,
    ) -> Result<NodeHandle, IrError> {
        let handle = self.new_node(reg, opcode, operands, ty, sym, spos)?;
        self.code.push(handle);
        Ok(handle)
    }

    /// Resolve a node handle.
    pub fn node(&self, handle: NodeHandle) -> Result<&NodeData, ArenaError> {
        self.nodes.get(handle)
    }

    /// Whether `handle` resolves against this container.
    pub fn contains_node(&self, handle: NodeHandle) -> bool {
        self.nodes.contains(handle)
    }

    /// Render the statement list for debugging.
    ///
    /// One line per statement: handle, opcode name, operands, symbol.
    pub fn dump(&self, reg: &OpcodeRegistry, syms: &SymbolTable) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "container {}:", syms.name_str(self.name));
        for &h in &self.code {
            let Ok(node) = self.nodes.get(h) else {
                let _ = writeln!(out, "  #{} <unresolvable>", h.index());
                continue;
            };
            let _ = write!(out, "  #{} {}", h.index(), reg.op_name(node.opcode));
            for op in &node.operands {
                match op {
                    Operand::Node(n) => {
                        let _ = write!(out, " %{}", n.index());
                    }
                    Operand::Label(l) => {
                        let _ = write!(out, " @{}", l.index());
                    }
                    Operand::Sym(s) => {
                        let name = syms
                            .symbol(*s)
                            .map(|d| syms.name_str(d.name))
                            .unwrap_or("<stale>");
                        let _ = write!(out, " {name}");
                    }
                    Operand::Const(c) => {
                        let _ = write!(out, " c{}", c.index());
                    }
                }
            }
            if let Some(s) = node.sym {
                let name = syms
                    .symbol(s)
                    .map(|d| syms.name_str(d.name))
                    .unwrap_or("<stale>");
                let _ = write!(out, " [{name}]");
            }
            let _ = writeln!(out);
        }
        out
    }
}

#[cfg(test)]
mod tests;
