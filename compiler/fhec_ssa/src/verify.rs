//! SSA verification.
//!
//! The verifier takes the container, its symbol table, and an
//! [`SsaForm`] and checks the SSA invariants without mutating any of
//! them. Violations are collected rather than short-circuited, so one
//! run over a broken function reports everything. Running it twice
//! yields identical results.

use fhec_ir::{Container, NodeHandle, Spos};
use fhec_sym::{SymbolTable, SymHandle};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::build::{expr_nodes, SsaForm, VerDef, VerId};
use crate::cfg::BlockId;
use crate::error::SsaVerifyError;

/// Read-only SSA checker.
pub struct SsaVerifier<'a> {
    cont: &'a Container,
    syms: &'a SymbolTable,
    ssa: &'a SsaForm,
}

/// Where a node sits: its block and its statement position within it.
#[derive(Clone, Copy)]
struct Loc {
    block: BlockId,
    stmt_pos: usize,
}

impl<'a> SsaVerifier<'a> {
    pub fn new(cont: &'a Container, syms: &'a SymbolTable, ssa: &'a SsaForm) -> Self {
        Self { cont, syms, ssa }
    }

    /// Check every SSA invariant, returning all violations found.
    ///
    /// Checks, in order: handle liveness (nodes and symbols recorded in
    /// the form still resolve), single definition per `(symbol,
    /// version)`, phi arity against predecessor counts, and dominance
    /// of every definition over its uses (including phi operands over
    /// their predecessor edges).
    pub fn verify(&self) -> Result<(), Vec<SsaVerifyError>> {
        let mut errors = Vec::new();

        let locs = self.locate_nodes(&mut errors);
        self.check_dangling(&mut errors);
        self.check_single_def(&mut errors);
        self.check_phis(&locs, &mut errors);
        self.check_uses(&locs, &mut errors);

        debug!(
            versions = self.ssa.versions.len(),
            phis = self.ssa.phis.len(),
            violations = errors.len(),
            "ssa verify"
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Map every node reachable from a block's statement list to its
    /// location. Unresolvable statement trees are reported and skipped.
    fn locate_nodes(&self, errors: &mut Vec<SsaVerifyError>) -> FxHashMap<NodeHandle, Loc> {
        let mut locs = FxHashMap::default();
        for b in self.ssa.cfg.ids() {
            for (pos, &stmt) in self.ssa.cfg.block(b).stmts.iter().enumerate() {
                match expr_nodes(self.cont, stmt) {
                    Ok(nodes) => {
                        for h in nodes {
                            locs.insert(
                                h,
                                Loc {
                                    block: b,
                                    stmt_pos: pos,
                                },
                            );
                        }
                    }
                    Err(e) => errors.push(SsaVerifyError::DanglingReference(e)),
                }
            }
        }
        locs
    }

    /// Every node and symbol handle recorded in the form must still
    /// resolve against its owner.
    fn check_dangling(&self, errors: &mut Vec<SsaVerifyError>) {
        for &h in sorted_keys(&self.ssa.use_ver).iter().chain(&sorted_keys(&self.ssa.def_ver)) {
            if let Err(e) = self.cont.node(h) {
                errors.push(SsaVerifyError::DanglingReference(e));
            }
        }
        for v in &self.ssa.versions {
            if let Err(e) = self.syms.symbol(v.sym) {
                errors.push(SsaVerifyError::DanglingReference(e));
            }
            if let VerDef::Stmt(h) = v.def {
                if let Err(e) = self.cont.node(h) {
                    errors.push(SsaVerifyError::DanglingReference(e));
                }
            }
        }
    }

    /// No `(symbol, version)` pair may have two defining occurrences,
    /// and no version id may be defined by two stores or phis.
    fn check_single_def(&self, errors: &mut Vec<SsaVerifyError>) {
        let mut seen_pairs: FxHashMap<(SymHandle, u32), u32> = FxHashMap::default();
        for v in &self.ssa.versions {
            let count = seen_pairs.entry((v.sym, v.num)).or_insert(0);
            *count += 1;
            if *count == 2 {
                errors.push(SsaVerifyError::VersionReuse {
                    sym: v.sym,
                    version: v.num,
                });
            }
        }

        let mut def_count: FxHashMap<VerId, u32> = FxHashMap::default();
        for &h in &sorted_keys(&self.ssa.def_ver) {
            if let Some(&vid) = self.ssa.def_ver.get(&h) {
                let count = def_count.entry(vid).or_insert(0);
                *count += 1;
                if *count == 2 {
                    self.report_reuse(vid, errors);
                }
            }
        }
        for phi in &self.ssa.phis {
            let count = def_count.entry(phi.result).or_insert(0);
            *count += 1;
            if *count == 2 {
                self.report_reuse(phi.result, errors);
            }
        }
    }

    fn report_reuse(&self, vid: VerId, errors: &mut Vec<SsaVerifyError>) {
        if let Some(v) = self.ssa.versions.get(vid.index()) {
            errors.push(SsaVerifyError::VersionReuse {
                sym: v.sym,
                version: v.num,
            });
        }
    }

    /// Each phi must carry exactly one operand per predecessor, and the
    /// version flowing in through slot `i` must be defined on a path to
    /// predecessor `i`.
    fn check_phis(&self, locs: &FxHashMap<NodeHandle, Loc>, errors: &mut Vec<SsaVerifyError>) {
        for phi in &self.ssa.phis {
            let preds = &self.ssa.cfg.block(phi.block).preds;
            if phi.args.len() != preds.len() {
                errors.push(SsaVerifyError::PhiArityMismatch {
                    block: phi.block,
                    sym: phi.sym,
                    expected: preds.len(),
                    found: phi.args.len(),
                });
                continue;
            }
            for (slot, &arg) in phi.args.iter().enumerate() {
                let pred = preds[slot];
                let Some(v) = self.ssa.versions.get(arg.index()) else {
                    continue;
                };
                let reaches = match v.def {
                    VerDef::Entry => true,
                    VerDef::Phi(q) => self
                        .ssa
                        .phis
                        .get(q.index())
                        .is_some_and(|ph| self.ssa.dom.dominates(ph.block, pred)),
                    VerDef::Stmt(h) => locs
                        .get(&h)
                        .is_some_and(|l| self.ssa.dom.dominates(l.block, pred)),
                };
                if !reaches {
                    // Attribute the violation to the edge's source: the
                    // predecessor's terminator.
                    let node = self
                        .ssa
                        .cfg
                        .block(pred)
                        .stmts
                        .last()
                        .copied()
                        .unwrap_or_else(|| self.ssa.cfg.block(phi.block).first());
                    errors.push(SsaVerifyError::DominanceViolation {
                        node,
                        sym: v.sym,
                        version: v.num,
                        spos: self.spos_of(node),
                    });
                }
            }
        }
    }

    /// Every recorded use must be dominated by its version's
    /// definition; within a block, the defining statement must precede
    /// the using one (phi definitions precede all statements).
    fn check_uses(&self, locs: &FxHashMap<NodeHandle, Loc>, errors: &mut Vec<SsaVerifyError>) {
        for &use_node in &sorted_keys(&self.ssa.use_ver) {
            let Some(&vid) = self.ssa.use_ver.get(&use_node) else {
                continue;
            };
            let Some(use_loc) = locs.get(&use_node).copied() else {
                continue;
            };
            let Some(v) = self.ssa.versions.get(vid.index()) else {
                continue;
            };
            let dominated = match v.def {
                VerDef::Entry => true,
                VerDef::Phi(p) => self
                    .ssa
                    .phis
                    .get(p.index())
                    .is_some_and(|phi| self.ssa.dom.dominates(phi.block, use_loc.block)),
                VerDef::Stmt(d) => match locs.get(&d).copied() {
                    None => false,
                    Some(def_loc) if def_loc.block == use_loc.block => {
                        def_loc.stmt_pos < use_loc.stmt_pos
                    }
                    Some(def_loc) => self.ssa.dom.dominates(def_loc.block, use_loc.block),
                },
            };
            if !dominated {
                errors.push(SsaVerifyError::DominanceViolation {
                    node: use_node,
                    sym: v.sym,
                    version: v.num,
                    spos: self.spos_of(use_node),
                });
            }
        }
    }

    /// Source position of a node, for error reporting; synthesized
    /// nodes and unresolvable handles report the none position.
    fn spos_of(&self, node: NodeHandle) -> Spos {
        self.cont.node(node).map(|n| n.spos).unwrap_or(Spos::NONE)
    }
}

/// Map keys in ascending handle order, for deterministic reporting.
fn sorted_keys<V>(map: &FxHashMap<NodeHandle, V>) -> Vec<NodeHandle> {
    let mut keys: Vec<NodeHandle> = map.keys().copied().collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests;
