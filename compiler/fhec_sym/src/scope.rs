//! Lexical scope tree.

use std::fmt;

/// Identifier of a scope within one [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The compilation unit's root scope.
    pub const GLOBAL: Self = Self(0);

    /// Raw index value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::GLOBAL {
            f.write_str("global")
        } else {
            write!(f, "scope{}", self.0)
        }
    }
}

struct ScopeData {
    parent: Option<ScopeId>,
    depth: u32,
}

/// Tree of lexical scopes rooted at [`ScopeId::GLOBAL`].
///
/// Scope nesting is strictly a tree: every scope except the root has
/// exactly one parent, fixed at creation.
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
}

impl ScopeTree {
    /// Create a tree containing only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeData {
                parent: None,
                depth: 0,
            }],
        }
    }

    /// Open a new scope nested in `parent`.
    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        debug_assert!(parent.index() < self.scopes.len());
        let depth = self.scopes[parent.index()].depth + 1;
        #[allow(clippy::cast_possible_truncation)]
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            parent: Some(parent),
            depth,
        });
        id
    }

    /// Parent of `scope`, `None` for the global scope.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.index()).and_then(|s| s.parent)
    }

    /// Nesting depth of `scope` (global scope is depth 0).
    pub fn depth(&self, scope: ScopeId) -> u32 {
        self.scopes.get(scope.index()).map_or(0, |s| s.depth)
    }

    /// Walk the scope chain from `scope` (inclusive) out to the root.
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        let mut current = Some(scope);
        std::iter::from_fn(move || {
            let here = current?;
            current = self.parent(here);
            Some(here)
        })
    }

    /// Number of scopes in the tree.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false: the global scope exists from creation.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
