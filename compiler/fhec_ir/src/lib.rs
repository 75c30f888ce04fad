//! Opcode-tagged node/container graph for the FHEC IR core.
//!
//! This crate provides:
//!
//! - **Opcodes** ([`Opcode`]) — a 16-bit tag packing a domain id (high 6
//!   bits) and an operator id (low 10 bits). Each IR domain (core,
//!   vector, scheme, polynomial) owns its own operator space.
//! - **Opcode registry** ([`OpcodeRegistry`], [`OpcodeInfo`]) — a
//!   declarative per-opcode description of arity, operand kinds, result
//!   rule, and properties, loaded once per domain. Every node
//!   construction is validated against it.
//! - **Nodes and containers** ([`NodeData`], [`Container`]) — typed
//!   operand lists over arena handles; one container per function owning
//!   a node arena, a statement list, an entry node, and a local scope.
//! - **Domain dispatch** ([`DispatchTable`]) — an explicit
//!   `(domain, operator) -> handler` table with reserved
//!   default/null/invalid fallback entries, replacing class-hierarchy
//!   dispatch. New domains register independently of existing ones.
//!
//! Construction failures never corrupt a container: a node is validated
//! *before* it is allocated, so no half-built node is ever reachable by
//! handle.

mod container;
mod dispatch;
mod error;
mod node;
mod opcode;
pub mod ops;
mod registry;
mod spos;
#[cfg(test)]
mod test_helpers;

pub use container::Container;
pub use dispatch::{DispatchTable, HandlerEntry, HandlerFn};
pub use error::IrError;
pub use node::{NodeData, NodeHandle, Operand};
pub use opcode::{domain, Opcode};
pub use registry::{Arity, DomainInfo, OpcodeInfo, OpcodeProps, OpcodeRegistry, OperandKind, ResultRule};
pub use spos::Spos;
