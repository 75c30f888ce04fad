//! Shipped domain opcode tables.
//!
//! Each submodule declares one domain: its opcode constants and the
//! declarative [`OpcodeInfo`](crate::OpcodeInfo) table registered into
//! the [`OpcodeRegistry`](crate::OpcodeRegistry). External passes add
//! further domains the same way without touching these tables.

pub mod core;
pub mod poly;
pub mod scheme;
pub mod vector;
