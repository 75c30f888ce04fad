//! SSA construction.
//!
//! The builder derives a [`SsaForm`] from a container in three passes:
//! def/use collection over the registry's `LOAD`/`STORE` properties,
//! minimal phi placement over iterated dominance frontiers, and
//! dominator-tree renaming with per-symbol version stacks. The
//! container itself is never modified; all results live in the side
//! structure, and a failed build returns only the error.
//!
//! Every traversal order is canonical: symbols ascend by handle, blocks
//! by leading statement handle, phi operands by predecessor order. Two
//! builds over the same container are therefore bit-identical.

use fhec_arena::ArenaError;
use fhec_ir::{Container, NodeHandle, Operand, OpcodeProps, OpcodeRegistry};
use fhec_sym::SymHandle;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::cfg::{BlockId, Cfg};
use crate::dom::DomTree;
use crate::error::SsaBuildError;

/// Index into [`SsaForm::versions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerId(u32);

impl VerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index into [`SsaForm::phis`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhiId(u32);

impl PhiId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where one version of a symbol is defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerDef {
    /// The implicit definition every symbol has at function entry; its
    /// version number is always zero. A use reached by no store reads
    /// this version rather than being an error.
    Entry,
    /// A store statement.
    Stmt(NodeHandle),
    /// A phi at the head of its block.
    Phi(PhiId),
}

/// One `(symbol, version)` pair and its defining occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionData {
    pub sym: SymHandle,
    /// Version number, unique per symbol and monotonically assigned.
    pub num: u32,
    pub def: VerDef,
}

/// A phi placed at a block head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhiNode {
    pub block: BlockId,
    pub sym: SymHandle,
    /// The version this phi defines.
    pub result: VerId,
    /// One operand per predecessor, slot-aligned with
    /// [`Block::preds`](crate::cfg::Block::preds).
    pub args: Vec<VerId>,
}

/// The SSA side structure for one container.
///
/// Owns the CFG and dominator tree it was built over, the version
/// table, the phis, and the per-node use/def version maps. Fields are
/// public so verification-oriented tooling can inspect (or deliberately
/// corrupt) the structure; ordinary consumers go through the accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SsaForm {
    pub cfg: Cfg,
    pub dom: DomTree,
    /// All versions; index space of [`VerId`]. Zero versions of every
    /// referenced symbol come first, in ascending symbol order.
    pub versions: Vec<VersionData>,
    /// All phis; index space of [`PhiId`].
    pub phis: Vec<PhiNode>,
    /// Phis at each block head, ascending by symbol handle.
    pub block_phis: Vec<Vec<PhiId>>,
    /// Version consumed by each load node.
    pub use_ver: FxHashMap<NodeHandle, VerId>,
    /// Version defined by each store statement.
    pub def_ver: FxHashMap<NodeHandle, VerId>,
}

impl SsaForm {
    /// Resolve a version id.
    pub fn version(&self, v: VerId) -> &VersionData {
        &self.versions[v.index()]
    }

    /// Resolve a phi id.
    pub fn phi(&self, p: PhiId) -> &PhiNode {
        &self.phis[p.index()]
    }

    /// Phis at the head of `b`, ascending by symbol handle.
    pub fn phis_in(&self, b: BlockId) -> &[PhiId] {
        &self.block_phis[b.index()]
    }

    /// Version consumed by a load node, if it was renamed.
    pub fn use_version(&self, n: NodeHandle) -> Option<VerId> {
        self.use_ver.get(&n).copied()
    }

    /// Version defined by a store statement, if it was renamed.
    pub fn def_version(&self, n: NodeHandle) -> Option<VerId> {
        self.def_ver.get(&n).copied()
    }
}

/// Every node in the expression tree under `root`, including `root`,
/// following value operands only.
pub(crate) fn expr_nodes(
    cont: &Container,
    root: NodeHandle,
) -> Result<Vec<NodeHandle>, ArenaError> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(h) = stack.pop() {
        out.push(h);
        let node = cont.node(h)?;
        for op in &node.operands {
            if let Operand::Node(child) = op {
                stack.push(*child);
            }
        }
    }
    Ok(out)
}

/// Builds the SSA form for one container.
pub struct SsaBuilder<'a> {
    cont: &'a Container,
    reg: &'a OpcodeRegistry,
}

/// Renaming work item; exits restore the version stacks pushed while
/// the block was open.
enum Action {
    Enter(BlockId),
    Exit { pushes: usize },
}

impl<'a> SsaBuilder<'a> {
    pub fn new(cont: &'a Container, reg: &'a OpcodeRegistry) -> Self {
        Self { cont, reg }
    }

    /// Run the build.
    ///
    /// Transactional: any error leaves no partial SSA state anywhere;
    /// the container was never touched to begin with.
    pub fn build(self) -> Result<SsaForm, SsaBuildError> {
        let cfg = Cfg::build(self.cont, self.reg)?;
        let dom = DomTree::build(&cfg);
        let frontiers = dom.frontiers(&cfg);

        let (universe, def_blocks, loads) = self.collect_defs_uses(&cfg)?;
        debug!(
            blocks = cfg.num_blocks(),
            symbols = universe.len(),
            "ssa: collected defs and uses"
        );

        let mut state = Renamer::new(&cfg, universe);
        state.place_phis(&frontiers, &def_blocks)?;
        debug!(phis = state.phi_slots.len(), "ssa: phis placed");

        state.rename(self.cont, self.reg, &cfg, &dom, &loads)?;
        debug!(versions = state.versions.len(), "ssa: renamed");

        Ok(state.finish(cfg, dom))
    }

    /// One pass over every reachable statement tree, collecting the
    /// referenced-symbol universe, per-symbol definition blocks, and
    /// the set of load nodes.
    #[allow(clippy::type_complexity)]
    fn collect_defs_uses(
        &self,
        cfg: &Cfg,
    ) -> Result<
        (
            Vec<SymHandle>,
            FxHashMap<SymHandle, Vec<BlockId>>,
            FxHashMap<NodeHandle, SymHandle>,
        ),
        SsaBuildError,
    > {
        let mut universe: Vec<SymHandle> = Vec::new();
        let mut def_blocks: FxHashMap<SymHandle, Vec<BlockId>> = FxHashMap::default();
        let mut loads: FxHashMap<NodeHandle, SymHandle> = FxHashMap::default();

        for b in cfg.ids() {
            for &stmt in &cfg.block(b).stmts {
                for h in expr_nodes(self.cont, stmt)? {
                    let node = self.cont.node(h)?;
                    let info =
                        self.reg
                            .info(node.opcode)
                            .ok_or(SsaBuildError::UnknownOpcode {
                                opcode: node.opcode,
                            })?;
                    if !info.props.contains(OpcodeProps::HAS_SYM) {
                        continue;
                    }
                    let Some(sym) = node.sym else { continue };
                    if info.props.contains(OpcodeProps::LOAD) {
                        loads.insert(h, sym);
                        universe.push(sym);
                    }
                    // Only statement roots define; a store can never sit
                    // inside an expression tree.
                    if h == stmt && info.props.contains(OpcodeProps::STORE) {
                        def_blocks.entry(sym).or_default().push(b);
                        universe.push(sym);
                    }
                }
            }
        }

        universe.sort_unstable();
        universe.dedup();
        Ok((universe, def_blocks, loads))
    }
}

/// Mutable renaming state, separate from the borrowed inputs.
struct Renamer {
    /// Referenced symbols, ascending; index space for the stacks.
    universe: Vec<SymHandle>,
    sym_index: FxHashMap<SymHandle, usize>,
    versions: Vec<VersionData>,
    /// Zero version per symbol index.
    zero: Vec<VerId>,
    /// Next version number per symbol index.
    counters: Vec<u32>,
    /// Version stack per symbol index; the zero version is the
    /// permanent bottom entry.
    stacks: Vec<Vec<VerId>>,
    /// `(block, sym)` per phi; args and results filled during renaming.
    phi_slots: Vec<(BlockId, SymHandle)>,
    phi_results: Vec<Option<VerId>>,
    phi_args: Vec<Vec<Option<VerId>>>,
    block_phis: Vec<Vec<PhiId>>,
    use_ver: FxHashMap<NodeHandle, VerId>,
    def_ver: FxHashMap<NodeHandle, VerId>,
    num_blocks: usize,
}

impl Renamer {
    fn new(cfg: &Cfg, universe: Vec<SymHandle>) -> Self {
        let mut versions = Vec::new();
        let mut zero = Vec::with_capacity(universe.len());
        let mut stacks = Vec::with_capacity(universe.len());
        let mut sym_index = FxHashMap::default();
        for (i, &sym) in universe.iter().enumerate() {
            let vid = VerId(versions.len() as u32);
            versions.push(VersionData {
                sym,
                num: 0,
                def: VerDef::Entry,
            });
            zero.push(vid);
            stacks.push(vec![vid]);
            sym_index.insert(sym, i);
        }
        Self {
            counters: vec![1; universe.len()],
            universe,
            sym_index,
            versions,
            zero,
            stacks,
            phi_slots: Vec::new(),
            phi_results: Vec::new(),
            phi_args: Vec::new(),
            block_phis: vec![Vec::new(); cfg.num_blocks()],
            use_ver: FxHashMap::default(),
            def_ver: FxHashMap::default(),
            num_blocks: cfg.num_blocks(),
        }
    }

    /// Minimal phi placement: iterated dominance frontier of each
    /// symbol's definition blocks. The entry block counts as a
    /// definition site for every symbol (the zero version).
    ///
    /// Symbols are processed in ascending order and each symbol's phi
    /// blocks are sorted before ids are assigned, so phi ids and the
    /// per-block phi lists are canonical.
    fn place_phis(
        &mut self,
        frontiers: &[Vec<BlockId>],
        def_blocks: &FxHashMap<SymHandle, Vec<BlockId>>,
    ) -> Result<(), SsaBuildError> {
        let bound = ((self.num_blocks as u32 + 1) * (self.universe.len() as u32 + 1))
            .saturating_mul(4)
            .saturating_add(64);
        let mut iterations = 0u32;

        for &sym in &self.universe {
            let mut worklist: Vec<BlockId> = def_blocks.get(&sym).cloned().unwrap_or_default();
            worklist.push(BlockId::new(0));
            worklist.sort_unstable();
            worklist.dedup();

            let mut queued = vec![false; self.num_blocks];
            for &b in &worklist {
                queued[b.index()] = true;
            }
            let mut has_phi = vec![false; self.num_blocks];

            while let Some(b) = worklist.pop() {
                iterations += 1;
                if iterations > bound {
                    return Err(SsaBuildError::NonTerminatingBuild { iterations });
                }
                for &d in &frontiers[b.index()] {
                    if !has_phi[d.index()] {
                        has_phi[d.index()] = true;
                        if !queued[d.index()] {
                            queued[d.index()] = true;
                            worklist.push(d);
                        }
                    }
                }
            }

            let mut phi_blocks: Vec<BlockId> = (0..self.num_blocks)
                .map(BlockId::new)
                .filter(|b| has_phi[b.index()])
                .collect();
            phi_blocks.sort_unstable();
            for b in phi_blocks {
                let id = PhiId(self.phi_slots.len() as u32);
                self.phi_slots.push((b, sym));
                self.phi_results.push(None);
                self.phi_args.push(Vec::new());
                self.block_phis[b.index()].push(id);
            }
        }
        Ok(())
    }

    fn new_version(&mut self, sym_idx: usize, def: VerDef) -> VerId {
        let vid = VerId(self.versions.len() as u32);
        let num = self.counters[sym_idx];
        self.counters[sym_idx] = num + 1;
        self.versions.push(VersionData {
            sym: self.universe[sym_idx],
            num,
            def,
        });
        vid
    }

    fn current(&self, sym_idx: usize) -> VerId {
        self.stacks[sym_idx]
            .last()
            .copied()
            .unwrap_or(self.zero[sym_idx])
    }

    /// Dominator-tree renaming walk, iterative with an explicit action
    /// stack. Entering a block defines its phis, versions every load
    /// and store in statement order, and feeds successor phi operands;
    /// exiting pops exactly the versions the block pushed.
    fn rename(
        &mut self,
        cont: &Container,
        reg: &OpcodeRegistry,
        cfg: &Cfg,
        dom: &DomTree,
        loads: &FxHashMap<NodeHandle, SymHandle>,
    ) -> Result<(), SsaBuildError> {
        let mut push_log: Vec<usize> = Vec::new();
        let mut actions = vec![Action::Enter(dom.entry())];

        while let Some(action) = actions.pop() {
            match action {
                Action::Enter(b) => {
                    let mut pushes = 0usize;

                    for i in 0..self.block_phis[b.index()].len() {
                        let p = self.block_phis[b.index()][i];
                        let sym = self.phi_slots[p.index()].1;
                        let Some(&idx) = self.sym_index.get(&sym) else {
                            continue;
                        };
                        let vid = self.new_version(idx, VerDef::Phi(p));
                        self.phi_results[p.index()] = Some(vid);
                        self.stacks[idx].push(vid);
                        push_log.push(idx);
                        pushes += 1;
                    }

                    for &stmt in &cfg.block(b).stmts {
                        for h in expr_nodes(cont, stmt)? {
                            if let Some(&sym) = loads.get(&h) {
                                if let Some(&idx) = self.sym_index.get(&sym) {
                                    self.use_ver.insert(h, self.current(idx));
                                }
                            }
                        }
                        let node = cont.node(stmt)?;
                        let info = reg
                            .info(node.opcode)
                            .ok_or(SsaBuildError::UnknownOpcode {
                                opcode: node.opcode,
                            })?;
                        if info.props.contains(OpcodeProps::STORE) {
                            if let Some(sym) = node.sym {
                                if let Some(&idx) = self.sym_index.get(&sym) {
                                    let vid = self.new_version(idx, VerDef::Stmt(stmt));
                                    self.def_ver.insert(stmt, vid);
                                    self.stacks[idx].push(vid);
                                    push_log.push(idx);
                                    pushes += 1;
                                }
                            }
                        }
                    }

                    self.feed_successor_phis(cfg, b);

                    actions.push(Action::Exit { pushes });
                    for &c in dom.children(b).iter().rev() {
                        actions.push(Action::Enter(c));
                    }
                }
                Action::Exit { pushes } => {
                    for _ in 0..pushes {
                        if let Some(idx) = push_log.pop() {
                            self.stacks[idx].pop();
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Record the versions flowing along each outgoing edge into the
    /// successor's phi operand slot for this block.
    fn feed_successor_phis(&mut self, cfg: &Cfg, b: BlockId) {
        for &s in &cfg.block(b).succs {
            let Some(slot) = cfg.block(s).preds.iter().position(|&p| p == b) else {
                continue;
            };
            for i in 0..self.block_phis[s.index()].len() {
                let p = self.block_phis[s.index()][i];
                let sym = self.phi_slots[p.index()].1;
                let Some(&idx) = self.sym_index.get(&sym) else {
                    continue;
                };
                let args = &mut self.phi_args[p.index()];
                if args.len() <= slot {
                    args.resize(slot + 1, None);
                }
                args[slot] = Some(self.stacks[idx].last().copied().unwrap_or(self.zero[idx]));
            }
        }
    }

    /// Assemble the final immutable form. Phi results and operands left
    /// unfilled (unreachable blocks or predecessors) fall back to the
    /// symbol's zero version, keeping arity intact.
    fn finish(self, cfg: Cfg, dom: DomTree) -> SsaForm {
        let Renamer {
            sym_index,
            versions,
            zero,
            phi_slots,
            phi_results,
            mut phi_args,
            block_phis,
            use_ver,
            def_ver,
            ..
        } = self;

        let zero_of = |sym: SymHandle| -> VerId {
            sym_index.get(&sym).map_or(VerId(0), |&i| zero[i])
        };

        let mut phis = Vec::with_capacity(phi_slots.len());
        for (i, &(block, sym)) in phi_slots.iter().enumerate() {
            let npreds = cfg.block(block).preds.len();
            let mut raw = std::mem::take(&mut phi_args[i]);
            raw.resize(npreds, None);
            let args = raw
                .into_iter()
                .map(|a| a.unwrap_or_else(|| zero_of(sym)))
                .collect();
            phis.push(PhiNode {
                block,
                sym,
                result: phi_results[i].unwrap_or_else(|| zero_of(sym)),
                args,
            });
        }

        SsaForm {
            cfg,
            dom,
            versions,
            phis,
            block_phis,
            use_ver,
            def_ver,
        }
    }
}
