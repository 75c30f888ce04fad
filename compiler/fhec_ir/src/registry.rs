//! Declarative opcode registry.
//!
//! Each domain registers a table of [`OpcodeInfo`] entries once; every
//! `Container::new_node` call validates against the registered entry
//! before any node is allocated. The registry also feeds the domain
//! dispatch table with the set of known operators.

use rustc_hash::FxHashMap;

use crate::error::IrError;
use crate::opcode::Opcode;

/// What kind of handle an operand slot accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// A value-producing node in the same container.
    Value,
    /// A symbol handle.
    Sym,
    /// A label node in the same container (branch target).
    Label,
    /// A constant handle.
    Const,
}

/// Operand count contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many operands.
    Fixed(u8),
    /// At least `min` operands; the trailing operand-kind entry repeats.
    Variadic { min: u8 },
}

/// How the node's result type is determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultRule {
    /// Statement; produces no value. The declared type is ignored.
    Void,
    /// Expression; the caller declares the result type.
    Declared,
}

bitflags::bitflags! {
    /// Per-opcode properties.
    ///
    /// Drives block formation in the SSA builder (`BEGIN_BB`, `END_BB`,
    /// `FALLTHROUGH`), def/use collection (`LOAD`, `STORE`, `HAS_SYM`),
    /// and generic pass decisions (`COMMUTATIVE`, `SIDE_EFFECT`).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OpcodeProps: u32 {
        /// Operands may be reordered.
        const COMMUTATIVE = 1 << 0;
        /// Observable effect beyond its result value.
        const SIDE_EFFECT = 1 << 1;
        /// No node operands.
        const LEAF        = 1 << 2;
        /// Statement position.
        const STMT        = 1 << 3;
        /// Expression position.
        const EXPR        = 1 << 4;
        /// Reads the referenced symbol.
        const LOAD        = 1 << 5;
        /// Writes the referenced symbol.
        const STORE       = 1 << 6;
        /// Transfers control to a function.
        const CALL        = 1 << 7;
        /// Requires a symbol reference on the node.
        const HAS_SYM     = 1 << 8;
        /// Function entry marker.
        const ENTRY       = 1 << 9;
        /// Begins a basic block (label).
        const BEGIN_BB    = 1 << 10;
        /// Ends a basic block (branch, return).
        const END_BB      = 1 << 11;
        /// A block-ending node that also falls through to the next block
        /// (conditional branch).
        const FALLTHROUGH = 1 << 12;
    }
}

/// Declarative description of one opcode.
#[derive(Clone, Copy, Debug)]
pub struct OpcodeInfo {
    pub opcode: Opcode,
    pub name: &'static str,
    pub arity: Arity,
    /// Operand-kind contract, one entry per slot. For variadic opcodes
    /// the trailing entry repeats for every extra operand.
    pub operands: &'static [OperandKind],
    pub result: ResultRule,
    pub props: OpcodeProps,
}

impl OpcodeInfo {
    /// Expected kind for operand slot `index`, honoring variadic repeat.
    pub fn operand_kind(&self, index: usize) -> Option<OperandKind> {
        self.operands
            .get(index)
            .or_else(|| match self.arity {
                Arity::Variadic { .. } => self.operands.last(),
                Arity::Fixed(_) => None,
            })
            .copied()
    }
}

/// A registered IR domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainInfo {
    pub id: u8,
    pub name: &'static str,
}

/// The per-compilation-unit opcode registry.
///
/// Populated once per domain at unit creation; read-only afterwards.
pub struct OpcodeRegistry {
    domains: FxHashMap<u8, DomainInfo>,
    ops: FxHashMap<Opcode, &'static OpcodeInfo>,
}

impl OpcodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            domains: FxHashMap::default(),
            ops: FxHashMap::default(),
        }
    }

    /// Create a registry with the four shipped domains loaded.
    pub fn with_default_domains() -> Self {
        let mut reg = Self::new();
        // Tables are statically consistent with their domain ids, so
        // registration cannot fail here.
        let _ = crate::ops::core::register(&mut reg);
        let _ = crate::ops::vector::register(&mut reg);
        let _ = crate::ops::scheme::register(&mut reg);
        let _ = crate::ops::poly::register(&mut reg);
        reg
    }

    /// Register a domain and its opcode table.
    ///
    /// Fails if the domain id is taken, an opcode is already registered,
    /// or a table entry's opcode does not carry the domain's id.
    pub fn register_domain(
        &mut self,
        info: DomainInfo,
        table: &'static [OpcodeInfo],
    ) -> Result<(), IrError> {
        if self.domains.contains_key(&info.id) {
            return Err(IrError::DuplicateDomain { id: info.id });
        }
        for entry in table {
            if entry.opcode.domain() != info.id {
                return Err(IrError::ForeignDomainEntry {
                    domain: info.id,
                    opcode: entry.opcode,
                });
            }
            if self.ops.contains_key(&entry.opcode) {
                return Err(IrError::DuplicateOpcode {
                    opcode: entry.opcode,
                });
            }
        }
        self.domains.insert(info.id, info);
        for entry in table {
            self.ops.insert(entry.opcode, entry);
        }
        Ok(())
    }

    /// Metadata for an opcode, if registered.
    pub fn info(&self, opcode: Opcode) -> Option<&'static OpcodeInfo> {
        self.ops.get(&opcode).copied()
    }

    /// Metadata for a domain, if registered.
    pub fn domain(&self, id: u8) -> Option<DomainInfo> {
        self.domains.get(&id).copied()
    }

    /// Printable name for an opcode; falls back to the packed form.
    pub fn op_name(&self, opcode: Opcode) -> &'static str {
        self.info(opcode).map_or("<unknown>", |i| i.name)
    }
}

impl Default for OpcodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
