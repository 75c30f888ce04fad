//! Opcode encoding.

use std::fmt;

/// Well-known domain ids.
///
/// Domains are an open set: these are the four the toolchain ships, but
/// any id below 64 can be registered by an external pass.
pub mod domain {
    /// Scalar control flow, memory access, and arithmetic.
    pub const CORE: u8 = 0;
    /// SIMD-width vector operations produced by tensor lowering.
    pub const VECTOR: u8 = 1;
    /// Scheme-agnostic homomorphic-encryption operations.
    pub const SCHEME: u8 = 2;
    /// Polynomial-level operations below the scheme IR.
    pub const POLY: u8 = 3;
}

/// A 16-bit opcode: high 6 bits domain id, low 10 bits operator id.
///
/// Operator id 0 is reserved as invalid in every domain, so the all-zero
/// opcode is never a legal operation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Opcode(u16);

impl Opcode {
    pub const DOMAIN_BITS: u32 = 6;
    pub const OPERATOR_BITS: u32 = 10;

    /// The reserved invalid opcode.
    pub const INVALID: Self = Self(0);

    /// Pack a domain id and an operator id.
    pub const fn new(domain: u8, operator: u16) -> Self {
        assert!((domain as u32) < (1 << Self::DOMAIN_BITS));
        assert!((operator as u32) < (1 << Self::OPERATOR_BITS));
        Self(((domain as u16) << Self::OPERATOR_BITS) | operator)
    }

    /// Domain id (high 6 bits).
    #[inline]
    pub const fn domain(self) -> u8 {
        (self.0 >> Self::OPERATOR_BITS) as u8
    }

    /// Operator id within the domain (low 10 bits).
    #[inline]
    pub const fn operator(self) -> u16 {
        self.0 & ((1 << Self::OPERATOR_BITS) - 1)
    }

    /// Raw packed value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode({}, {})", self.domain(), self.operator())
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}.op{}", self.domain(), self.operator())
    }
}
