//! Domain dispatch.
//!
//! Pass traversal is data-driven: a [`DispatchTable`] maps `(domain,
//! operator)` to a handler, with a per-domain fallback entry. Three
//! reserved entries cover the cross-cutting cases:
//!
//! - [`HandlerEntry::Default`] — generic structural pass-through: visit
//!   each value operand, produce `R::default()`.
//! - [`HandlerEntry::Null`] — no-op; used to intentionally discard a
//!   domain a pass does not care about.
//! - [`HandlerEntry::Invalid`] — unconditional error; used to catch
//!   opcodes that must never reach a given pass.
//!
//! A domain that is never registered behaves as all-`Invalid`, so a
//! lowering pass notices immediately when IR from an unexpected stage
//! leaks through. New domains register independently of existing ones.

use rustc_hash::FxHashMap;

use crate::container::Container;
use crate::error::IrError;
use crate::node::{NodeHandle, Operand};
use crate::opcode::Opcode;

/// A concrete opcode handler.
///
/// Handlers receive the pass context, the container, and the node being
/// visited; recursion into operands is the handler's decision, typically
/// by calling [`DispatchTable::dispatch`] again.
pub type HandlerFn<C, R> = fn(&mut C, &Container, NodeHandle) -> Result<R, IrError>;

/// One slot in the dispatch table.
pub enum HandlerEntry<C, R> {
    /// Structural pass-through: dispatch into value operands, return
    /// `R::default()`.
    Default,
    /// Intentional no-op.
    Null,
    /// This opcode must never reach the pass.
    Invalid,
    /// A concrete handler.
    Handler(HandlerFn<C, R>),
}

// Manual impls: fn pointers are Copy regardless of C and R, but derives
// would demand `C: Clone, R: Clone`.
impl<C, R> Clone for HandlerEntry<C, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, R> Copy for HandlerEntry<C, R> {}

struct DomainDispatch<C, R> {
    fallback: HandlerEntry<C, R>,
    ops: FxHashMap<u16, HandlerEntry<C, R>>,
}

/// `(domain, operator) -> handler` dispatch table.
pub struct DispatchTable<C, R> {
    domains: FxHashMap<u8, DomainDispatch<C, R>>,
}

impl<C, R: Default> DispatchTable<C, R> {
    /// Create an empty table; every domain starts unregistered
    /// (all-`Invalid`).
    pub fn new() -> Self {
        Self {
            domains: FxHashMap::default(),
        }
    }

    /// Register a domain with a fallback entry for its unlisted
    /// operators. Re-registering replaces the domain's entries.
    pub fn register_domain(&mut self, domain: u8, fallback: HandlerEntry<C, R>) {
        self.domains.insert(
            domain,
            DomainDispatch {
                fallback,
                ops: FxHashMap::default(),
            },
        );
    }

    /// Register an entry for one opcode. The opcode's domain must have
    /// been registered first; its fallback covers everything else.
    pub fn register(&mut self, opcode: Opcode, entry: HandlerEntry<C, R>) {
        let dispatch = self
            .domains
            .entry(opcode.domain())
            .or_insert_with(|| DomainDispatch {
                fallback: HandlerEntry::Invalid,
                ops: FxHashMap::default(),
            });
        dispatch.ops.insert(opcode.operator(), entry);
    }

    /// Dispatch `handle` to its handler.
    pub fn dispatch(
        &self,
        cx: &mut C,
        cont: &Container,
        handle: NodeHandle,
    ) -> Result<R, IrError> {
        let node = cont.node(handle)?;
        let opcode = node.opcode;
        let entry = self
            .domains
            .get(&opcode.domain())
            .map_or(HandlerEntry::Invalid, |d| {
                d.ops.get(&opcode.operator()).copied().unwrap_or(d.fallback)
            });
        match entry {
            HandlerEntry::Handler(f) => f(cx, cont, handle),
            HandlerEntry::Null => Ok(R::default()),
            HandlerEntry::Invalid => Err(IrError::UnexpectedOpcode { opcode }),
            HandlerEntry::Default => {
                // Value operands only: label operands point backwards or
                // forwards in control flow and would cycle.
                for op in &node.operands {
                    if let Operand::Node(child) = op {
                        self.dispatch(cx, cont, *child)?;
                    }
                }
                Ok(R::default())
            }
        }
    }
}

impl<C, R: Default> Default for DispatchTable<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
