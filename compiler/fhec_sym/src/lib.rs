//! Scoped symbol, type, and constant tables for the FHEC IR core.
//!
//! One [`SymbolTable`] exists per compilation unit and is passed
//! explicitly to every pass — there is no process-wide singleton, so
//! multiple independent compilations can coexist in one process.
//!
//! This crate provides:
//!
//! - **Name interning** ([`NameInterner`], [`Name`]) — O(1) identifier
//!   comparison, concurrent read access for already-built IR.
//! - **Scope tree** ([`ScopeTree`], [`ScopeId`]) — lexical scopes rooted
//!   at the unit's global scope; lookup walks innermost → outermost with
//!   shadowing.
//! - **Symbols** ([`SymbolTable`], [`SymbolData`], [`SymbolKind`]) —
//!   declared once per `(name, scope)` unless the kind permits overloads
//!   (functions only), annotatable post-hoc via attributes.
//! - **Types** ([`TypeTable`], [`TypeDesc`]) — structural descriptors
//!   deduplicated by structural equality.
//! - **Constants** ([`ConstTable`], [`ConstValue`]) — deduplicated by
//!   content, so structurally identical constants share one handle.

mod consts;
mod interner;
mod scope;
mod symbol;
mod types;

pub use consts::{ConstData, ConstHandle, ConstTable, ConstValue};
pub use interner::{Name, NameInterner};
pub use scope::{ScopeId, ScopeTree};
pub use symbol::{AttrValue, SymHandle, SymbolData, SymbolError, SymbolKind, SymbolTable};
pub use types::{PrimType, TypeDesc, TypeHandle, TypeTable};
