//! String interner for identifier storage.
//!
//! Interned strings live for the process lifetime (they are leaked into
//! `'static` storage), which makes [`Name`] a plain `Copy` index and lets
//! diagnostics borrow resolved names without cloning.

use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// An interned identifier.
///
/// Equality and hashing are O(1) index comparisons. `Name(0)` is always
/// the empty string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The pre-interned empty string.
    pub const EMPTY: Self = Self(0);

    /// Raw index value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

struct InternInner {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// Interner mapping strings to [`Name`]s.
///
/// Interning takes a write lock; resolving takes a read lock, so
/// concurrent read-only passes over built IR can resolve names freely.
pub struct NameInterner {
    inner: RwLock<InternInner>,
}

impl NameInterner {
    /// Create an interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        map.insert("", 0u32);
        Self {
            inner: RwLock::new(InternInner {
                map,
                strings: vec![""],
            }),
        }
    }

    /// Intern `s`, returning its stable [`Name`].
    pub fn intern(&self, s: &str) -> Name {
        {
            let guard = self.inner.read();
            if let Some(&idx) = guard.map.get(s) {
                return Name(idx);
            }
        }

        let mut guard = self.inner.write();
        // Re-check under the write lock: another thread may have
        // interned the same string between the two lock acquisitions.
        if let Some(&idx) = guard.map.get(s) {
            return Name(idx);
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        #[allow(clippy::cast_possible_truncation)]
        let idx = guard.strings.len() as u32;
        guard.strings.push(leaked);
        guard.map.insert(leaked, idx);
        Name(idx)
    }

    /// Resolve a [`Name`] back to its string, if it was issued by this
    /// interner.
    pub fn resolve(&self, name: Name) -> Option<&'static str> {
        self.inner.read().strings.get(name.0 as usize).copied()
    }

    /// Number of interned strings (including the empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Whether only the empty string has been interned.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }
}

impl Default for NameInterner {
    fn default() -> Self {
        Self::new()
    }
}
