//! SSA construction and verification for the FHEC IR core.
//!
//! This crate turns a [`Container`](fhec_ir::Container) in mutable-
//! variable form into static single assignment form:
//!
//! - **CFG extraction** ([`Cfg`]) — basic blocks from label/branch
//!   nodes, successor and predecessor edges.
//! - **Dominance** ([`DomTree`]) — iterative Cooper-Harvey-Kennedy
//!   dominator computation plus dominance frontiers; handles arbitrary
//!   reducible and irreducible control flow without recursion.
//! - **SSA build** ([`SsaBuilder`], [`SsaForm`]) — minimal phi placement
//!   over iterated dominance frontiers, then dominator-tree renaming
//!   with per-symbol version stacks.
//! - **SSA verify** ([`SsaVerifier`]) — read-only, idempotent validation
//!   of the SSA invariants.
//!
//! The SSA form is a *side structure*: the builder never rewrites the
//! container, so non-SSA consumers stay valid. The build is
//! transactional — on any failure it returns an error and no partially
//! renamed state exists anywhere.
//!
//! # Determinism
//!
//! Block, symbol, and phi processing all follow canonical ascending
//! handle order, so two builds of the same container produce identical
//! version numbers and phi placement. Downstream passes cache by
//! structural hash and depend on this.

mod build;
mod cfg;
mod dom;
mod error;
#[cfg(test)]
mod test_helpers;
mod verify;

pub use build::{PhiId, PhiNode, SsaBuilder, SsaForm, VerDef, VerId, VersionData};
pub use cfg::{Block, BlockId, Cfg};
pub use dom::DomTree;
pub use error::{SsaBuildError, SsaVerifyError};
pub use verify::SsaVerifier;
