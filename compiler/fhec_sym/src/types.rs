//! Structural type descriptors, interned and deduplicated.

use std::fmt;

use fhec_arena::{Arena, ArenaError, ArenaKind, Handle};
use rustc_hash::FxHashMap;

use crate::interner::Name;

/// Handle to an interned [`TypeDesc`].
pub type TypeHandle = Handle<TypeDesc>;

/// Primitive types, including the FHE carrier types the scheme domains
/// compute on (`cipher`, `cipher3`, `plain`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimType {
    Void,
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    /// A ciphertext (two polynomial components).
    Cipher,
    /// A ciphertext with three components, produced by multiplication
    /// before relinearization.
    Cipher3,
    /// An encoded but unencrypted plaintext.
    Plain,
}

impl fmt::Display for PrimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimType::Void => "void",
            PrimType::Bool => "bool",
            PrimType::Int32 => "i32",
            PrimType::Int64 => "i64",
            PrimType::Float32 => "f32",
            PrimType::Float64 => "f64",
            PrimType::Cipher => "cipher",
            PrimType::Cipher3 => "cipher3",
            PrimType::Plain => "plain",
        };
        f.write_str(s)
    }
}

/// Structural description of a type.
///
/// Descriptors reference other types by handle, so aggregates nest
/// without ownership cycles.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// A primitive type.
    Prim(PrimType),
    /// Fixed-length array.
    Array { elem: TypeHandle, len: u32 },
    /// Named-field record.
    Record { fields: Vec<(Name, TypeHandle)> },
    /// Pointer-like reference to another type.
    Ref { pointee: TypeHandle },
}

/// Arena-backed table of type descriptors.
///
/// Interning deduplicates by structural equality: two requests for the
/// same structure return the same handle, so type equality downstream is
/// a handle comparison.
pub struct TypeTable {
    arena: Arena<TypeDesc>,
    dedup: FxHashMap<TypeDesc, TypeHandle>,
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(ArenaKind::Type),
            dedup: FxHashMap::default(),
        }
    }

    /// Intern a descriptor, returning the handle of the existing
    /// structurally equal entry if there is one.
    pub fn intern(&mut self, desc: TypeDesc) -> TypeHandle {
        if let Some(&h) = self.dedup.get(&desc) {
            return h;
        }
        let h = self.arena.alloc(desc.clone());
        self.dedup.insert(desc, h);
        h
    }

    /// Intern a primitive type.
    pub fn prim(&mut self, prim: PrimType) -> TypeHandle {
        self.intern(TypeDesc::Prim(prim))
    }

    /// Resolve a handle to its descriptor.
    pub fn desc(&self, handle: TypeHandle) -> Result<&TypeDesc, ArenaError> {
        self.arena.get(handle)
    }

    /// Whether `handle` resolves against this table.
    pub fn contains(&self, handle: TypeHandle) -> bool {
        self.arena.contains(handle)
    }

    /// Number of distinct types.
    pub fn len(&self) -> u32 {
        self.arena.len()
    }

    /// Whether no type has been interned.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
