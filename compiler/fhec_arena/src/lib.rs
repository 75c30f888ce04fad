//! Arena storage and generation-checked handles for the FHEC IR core.
//!
//! Every IR object (node, symbol, type descriptor, constant) lives in an
//! [`Arena`] and is addressed by a [`Handle`] instead of a reference.
//! This centralizes ownership: cyclic structures (control flow back
//! edges, phi self-references) are expressed as handle references, never
//! as live ownership cycles, so no cycle collection is ever needed.
//!
//! # Lifecycle
//!
//! Arenas are created at compilation-unit start and live for the unit's
//! entire lifetime. There is **no per-object free**: the only release
//! operation is [`Arena::reset`] (or dropping the arena), which bumps the
//! arena generation and thereby invalidates every outstanding handle.
//! A stale handle is always *detected* ([`ArenaError::StaleHandle`]),
//! never silently remapped to a new object.
//!
//! # Growth
//!
//! Storage grows in fixed-capacity blocks. A block is never reallocated
//! once created, so growth never moves previously allocated slots and
//! never invalidates previously issued handles.

mod arena;
mod handle;

pub use arena::{Arena, ArenaError, BLOCK_CAP};
pub use handle::{ArenaKind, Handle};

#[cfg(test)]
mod tests;
