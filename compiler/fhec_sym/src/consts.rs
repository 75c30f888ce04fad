//! Deduplicated constant storage.

use fhec_arena::{Arena, ArenaError, ArenaKind, Handle};
use rustc_hash::FxHashMap;

use crate::types::TypeHandle;

/// Handle to an interned constant.
pub type ConstHandle = Handle<ConstData>;

/// Constant payload.
///
/// Floats are stored as raw bits so the value can be hashed and compared
/// exactly (content-hash deduplication must not depend on float
/// semantics like `NaN != NaN`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Int(i64),
    /// `f64::to_bits` of the value.
    FloatBits(u64),
    /// Raw byte blob (weight tensors, encoded plaintexts).
    Bytes(Vec<u8>),
}

/// A constant together with its type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstData {
    pub value: ConstValue,
    pub ty: TypeHandle,
}

/// Arena-backed constant table deduplicated by content hash.
///
/// Two structurally identical constants of the same type share one
/// handle, so identity comparison downstream is a handle comparison.
pub struct ConstTable {
    arena: Arena<ConstData>,
    dedup: FxHashMap<ConstData, ConstHandle>,
}

impl ConstTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(ArenaKind::Constant),
            dedup: FxHashMap::default(),
        }
    }

    /// Intern a constant, returning the existing handle on a content
    /// match.
    pub fn intern(&mut self, value: ConstValue, ty: TypeHandle) -> ConstHandle {
        let data = ConstData { value, ty };
        if let Some(&h) = self.dedup.get(&data) {
            return h;
        }
        let h = self.arena.alloc(data.clone());
        self.dedup.insert(data, h);
        h
    }

    /// Intern an integer constant.
    pub fn intern_int(&mut self, value: i64, ty: TypeHandle) -> ConstHandle {
        self.intern(ConstValue::Int(value), ty)
    }

    /// Intern a float constant by bit pattern.
    pub fn intern_float(&mut self, value: f64, ty: TypeHandle) -> ConstHandle {
        self.intern(ConstValue::FloatBits(value.to_bits()), ty)
    }

    /// Resolve a handle to its constant.
    pub fn data(&self, handle: ConstHandle) -> Result<&ConstData, ArenaError> {
        self.arena.get(handle)
    }

    /// Whether `handle` resolves against this table.
    pub fn contains(&self, handle: ConstHandle) -> bool {
        self.arena.contains(handle)
    }

    /// Number of distinct constants.
    pub fn len(&self) -> u32 {
        self.arena.len()
    }

    /// Whether no constant has been interned.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

impl Default for ConstTable {
    fn default() -> Self {
        Self::new()
    }
}
