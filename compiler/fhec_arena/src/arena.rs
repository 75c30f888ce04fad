//! Block-growing arena allocator.

use std::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;

use crate::handle::{ArenaKind, Handle};

/// Slots per storage block. Blocks are allocated whole and never resized.
pub const BLOCK_CAP: usize = 512;

/// Monotonic source of arena-instance identifiers, so a handle can be
/// traced back to the exact arena that issued it.
static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(0);

/// Error resolving a handle against an arena.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The handle's generation does not match the arena's live
    /// generation (the arena was reset since the handle was issued) or
    /// the index was never allocated. Fatal to the calling operation.
    #[error("stale {kind} handle #{index}: generation {handle_gen} does not match arena generation {arena_gen}")]
    StaleHandle {
        kind: ArenaKind,
        index: u32,
        handle_gen: u32,
        arena_gen: u32,
    },

    /// The handle was issued by a different arena instance.
    #[error("foreign {kind} handle #{index}: issued by arena {issuer}, resolved against arena {resolver}")]
    ForeignHandle {
        kind: ArenaKind,
        index: u32,
        issuer: u32,
        resolver: u32,
    },
}

/// A homogeneous pool of one kind of IR object.
///
/// Allocation is amortized O(1): storage grows by pushing fixed-capacity
/// blocks, and a block's buffer never moves after creation. Objects are
/// never freed individually; see [`Arena::reset`].
pub struct Arena<T> {
    kind: ArenaKind,
    id: u32,
    generation: u32,
    blocks: Vec<Vec<T>>,
    len: u32,
}

impl<T> Arena<T> {
    /// Create an empty arena for objects of `kind`.
    pub fn new(kind: ArenaKind) -> Self {
        Self {
            kind,
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            blocks: Vec::new(),
            len: 0,
        }
    }

    /// The kind of object this arena stores.
    pub fn kind(&self) -> ArenaKind {
        self.kind
    }

    /// Number of live objects.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the arena holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocate a slot holding `value` and return its handle.
    pub fn alloc(&mut self, value: T) -> Handle<T> {
        let index = self.len;
        let block = index as usize / BLOCK_CAP;
        if block == self.blocks.len() {
            self.blocks.push(Vec::with_capacity(BLOCK_CAP));
        }
        // Capacity is reserved up front, so this push never reallocates
        // the block and existing slots never move.
        self.blocks[block].push(value);
        self.len += 1;
        Handle::new(self.id, index, self.generation)
    }

    /// Resolve a handle to a shared reference.
    pub fn get(&self, handle: Handle<T>) -> Result<&T, ArenaError> {
        self.check(handle)?;
        let index = handle.index_usize();
        Ok(&self.blocks[index / BLOCK_CAP][index % BLOCK_CAP])
    }

    /// Resolve a handle to a mutable reference.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T, ArenaError> {
        self.check(handle)?;
        let index = handle.index_usize();
        Ok(&mut self.blocks[index / BLOCK_CAP][index % BLOCK_CAP])
    }

    /// Whether `handle` resolves against this arena.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.check(handle).is_ok()
    }

    /// Re-create the handle for slot `index`, if that slot is live.
    ///
    /// Used by side tables that record bare indices (e.g. a serialized
    /// container) to get back a resolvable handle.
    pub fn handle_at(&self, index: u32) -> Option<Handle<T>> {
        (index < self.len).then(|| Handle::new(self.id, index, self.generation))
    }

    /// Iterate over `(handle, object)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        let id = self.id;
        let generation = self.generation;
        self.blocks
            .iter()
            .flatten()
            .enumerate()
            .map(move |(index, value)| {
                #[allow(clippy::cast_possible_truncation)]
                let index = index as u32;
                (Handle::new(id, index, generation), value)
            })
    }

    /// Discard every object at once and invalidate all issued handles.
    ///
    /// This is the only release operation the arena offers: the block
    /// storage is dropped wholesale and the generation is bumped so
    /// every outstanding handle resolves to `StaleHandle` afterwards.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.len = 0;
        self.generation += 1;
    }

    fn check(&self, handle: Handle<T>) -> Result<(), ArenaError> {
        if handle.arena_id() != self.id {
            return Err(ArenaError::ForeignHandle {
                kind: self.kind,
                index: handle.index(),
                issuer: handle.arena_id(),
                resolver: self.id,
            });
        }
        if handle.generation() != self.generation || handle.index() >= self.len {
            return Err(ArenaError::StaleHandle {
                kind: self.kind,
                index: handle.index(),
                handle_gen: handle.generation(),
                arena_gen: self.generation,
            });
        }
        Ok(())
    }
}
