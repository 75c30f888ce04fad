//! Typed handles into an arena.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// The kind of object an arena stores.
///
/// Carried by handles purely for diagnostics — type safety comes from the
/// `T` parameter on [`Handle`], not from this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArenaKind {
    /// IR nodes owned by a container.
    Node,
    /// Symbols owned by the symbol table.
    Symbol,
    /// Structural type descriptors.
    Type,
    /// Deduplicated constant values.
    Constant,
}

impl fmt::Display for ArenaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArenaKind::Node => "node",
            ArenaKind::Symbol => "symbol",
            ArenaKind::Type => "type",
            ArenaKind::Constant => "constant",
        };
        f.write_str(s)
    }
}

/// A stable reference into an [`Arena<T>`](crate::Arena).
///
/// A handle is `(arena instance, index, generation)`. It stays valid for
/// as long as the issuing arena's generation is unchanged; after a
/// [`reset`](crate::Arena::reset) the generation no longer matches and
/// resolution fails with [`StaleHandle`](crate::ArenaError::StaleHandle).
/// Handles issued by one arena are rejected by every other arena instance
/// ([`ForeignHandle`](crate::ArenaError::ForeignHandle)).
///
/// Handles are `Copy` regardless of `T` and order by index, which gives
/// every consumer the same canonical "ascending handle" ordering.
pub struct Handle<T> {
    arena: u32,
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(arena: u32, index: u32, generation: u32) -> Self {
        Self {
            arena,
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index within the issuing arena.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Index as `usize`, for indexing side tables.
    #[inline]
    pub fn index_usize(self) -> usize {
        self.index as usize
    }

    /// Identifier of the issuing arena instance.
    #[inline]
    pub fn arena_id(self) -> u32 {
        self.arena
    }

    /// Arena generation this handle was issued under.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would add spurious `T: Trait` bounds even though
// `T` only appears in `PhantomData`.

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.arena == other.arena
            && self.index == other.index
            && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arena.hash(state);
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.arena, self.index, self.generation).cmp(&(
            other.arena,
            other.index,
            other.generation,
        ))
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle#{}", self.index)
    }
}
