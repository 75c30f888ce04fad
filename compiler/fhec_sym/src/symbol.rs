//! The scoped symbol table.

use fhec_arena::{Arena, ArenaError, ArenaKind, Handle};
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use thiserror::Error;

use crate::interner::{Name, NameInterner};
use crate::scope::{ScopeId, ScopeTree};
use crate::types::TypeHandle;

/// Handle to a declared symbol.
pub type SymHandle = Handle<SymbolData>;

/// What a symbol declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Variable,
    Type,
    Constant,
    Field,
    Label,
}

impl SymbolKind {
    /// Whether two declarations of this kind may share a `(name, scope)`.
    ///
    /// Only functions overload; every other kind declares once per scope.
    pub fn allows_overload(self) -> bool {
        matches!(self, SymbolKind::Function)
    }
}

/// Post-hoc annotation value attached to a symbol.
///
/// Attributes let passes record inferred facts (storage class, inferred
/// type, loop role) without re-declaring the symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// Presence-only marker.
    Flag,
    Int(i64),
    Name(Name),
    Type(TypeHandle),
}

/// A declared symbol.
#[derive(Clone, Debug)]
pub struct SymbolData {
    pub name: Name,
    pub kind: SymbolKind,
    pub ty: TypeHandle,
    pub scope: ScopeId,
    attrs: FxHashMap<Name, AttrValue>,
}

/// Declaration and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// `(name, scope)` already holds a symbol of a kind that does not
    /// permit overloading.
    #[error("duplicate declaration of `{name}` in {scope}")]
    DuplicateDeclaration { name: &'static str, scope: ScopeId },

    /// No scope on the chain declares the name.
    #[error("undeclared symbol `{name}`")]
    UndeclaredSymbol { name: &'static str },
}

/// The per-compilation-unit symbol table.
///
/// Owns the name interner, the scope tree, and the symbol arena. Symbols
/// are addressed by handle and indexed by `(scope, name)` for lookup.
pub struct SymbolTable {
    names: NameInterner,
    scopes: ScopeTree,
    arena: Arena<SymbolData>,
    index: FxHashMap<(ScopeId, Name), SmallVec<[SymHandle; 1]>>,
}

impl SymbolTable {
    /// Create a table with only the global scope.
    pub fn new() -> Self {
        Self {
            names: NameInterner::new(),
            scopes: ScopeTree::new(),
            arena: Arena::new(ArenaKind::Symbol),
            index: FxHashMap::default(),
        }
    }

    /// Intern an identifier.
    pub fn intern(&self, s: &str) -> Name {
        self.names.intern(s)
    }

    /// Resolve a [`Name`] back to its string. Unknown names render as a
    /// placeholder rather than failing: this is used on the diagnostics
    /// path where a panic would mask the real error.
    pub fn name_str(&self, name: Name) -> &'static str {
        self.names.resolve(name).unwrap_or("<unknown>")
    }

    /// Open a new scope nested in `parent`.
    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.new_scope(parent)
    }

    /// The scope tree.
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Declare `name` in `scope`.
    ///
    /// Fails with [`SymbolError::DuplicateDeclaration`] if the slot is
    /// taken, unless both the existing and the new declaration are of a
    /// kind that permits overloading.
    pub fn declare(
        &mut self,
        name: Name,
        kind: SymbolKind,
        ty: TypeHandle,
        scope: ScopeId,
    ) -> Result<SymHandle, SymbolError> {
        if let Some(existing) = self.index.get(&(scope, name)) {
            let overloadable = kind.allows_overload()
                && existing.iter().all(|&h| {
                    self.arena
                        .get(h)
                        .map(|s| s.kind.allows_overload())
                        .unwrap_or(false)
                });
            if !overloadable {
                return Err(SymbolError::DuplicateDeclaration {
                    name: self.name_str(name),
                    scope,
                });
            }
        }
        let handle = self.arena.alloc(SymbolData {
            name,
            kind,
            ty,
            scope,
            attrs: FxHashMap::default(),
        });
        match self.index.get_mut(&(scope, name)) {
            Some(list) => list.push(handle),
            None => {
                self.index.insert((scope, name), smallvec![handle]);
            }
        }
        Ok(handle)
    }

    /// Intern `name` and declare it in one step.
    pub fn declare_named(
        &mut self,
        name: &str,
        kind: SymbolKind,
        ty: TypeHandle,
        scope: ScopeId,
    ) -> Result<SymHandle, SymbolError> {
        let name = self.names.intern(name);
        self.declare(name, kind, ty, scope)
    }

    /// Resolve `name` from `scope`, walking the scope chain innermost to
    /// outermost. The first scope that declares the name wins, shadowing
    /// outer declarations.
    pub fn lookup(&self, name: Name, scope: ScopeId) -> Result<SymHandle, SymbolError> {
        for s in self.scopes.chain(scope) {
            if let Some(list) = self.index.get(&(s, name)) {
                if let Some(&first) = list.first() {
                    return Ok(first);
                }
            }
        }
        Err(SymbolError::UndeclaredSymbol {
            name: self.name_str(name),
        })
    }

    /// All declarations of `name` in the innermost scope that declares
    /// it. More than one entry only occurs for function overloads.
    pub fn lookup_overloads(&self, name: Name, scope: ScopeId) -> Vec<SymHandle> {
        for s in self.scopes.chain(scope) {
            if let Some(list) = self.index.get(&(s, name)) {
                if !list.is_empty() {
                    return list.to_vec();
                }
            }
        }
        Vec::new()
    }

    /// Resolve a handle to its symbol.
    pub fn symbol(&self, handle: SymHandle) -> Result<&SymbolData, ArenaError> {
        self.arena.get(handle)
    }

    /// Whether `handle` resolves against this table.
    pub fn contains(&self, handle: SymHandle) -> bool {
        self.arena.contains(handle)
    }

    /// Attach (or replace) an attribute on a declared symbol.
    pub fn attach_attribute(
        &mut self,
        handle: SymHandle,
        key: Name,
        value: AttrValue,
    ) -> Result<(), ArenaError> {
        let sym = self.arena.get_mut(handle)?;
        sym.attrs.insert(key, value);
        Ok(())
    }

    /// Read an attribute previously attached to a symbol.
    pub fn attribute(&self, handle: SymHandle, key: Name) -> Result<Option<&AttrValue>, ArenaError> {
        Ok(self.arena.get(handle)?.attrs.get(&key))
    }

    /// Number of declared symbols (overloads counted individually).
    pub fn len(&self) -> u32 {
        self.arena.len()
    }

    /// Whether nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
