//! Dominance.
//!
//! Iterative Cooper-Harvey-Kennedy dominator computation over the CFG,
//! plus dominance frontiers for phi placement. Everything here is
//! worklist- or stack-based; block counts are unbounded and recursion
//! depth must not depend on input size.

use crate::cfg::{BlockId, Cfg};

/// Immediate-dominator tree of a [`Cfg`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomTree {
    /// Immediate dominator per block. The entry block points at itself;
    /// unreachable blocks have no entry.
    idom: Vec<Option<BlockId>>,
    /// Dominator-tree children per block, ascending.
    children: Vec<Vec<BlockId>>,
    entry: BlockId,
}

impl DomTree {
    /// Compute the dominator tree.
    ///
    /// Runs the CHK fixed-point over reverse postorder; converges in a
    /// handful of iterations for reducible flow and terminates for
    /// irreducible flow as well.
    pub fn build(cfg: &Cfg) -> Self {
        let num = cfg.num_blocks();
        let entry = cfg.entry();

        // Postorder over successor edges, iterative DFS.
        let mut visited = vec![false; num];
        let mut postorder: Vec<BlockId> = Vec::with_capacity(num);
        let mut stack: Vec<(BlockId, usize)> = vec![(entry, 0)];
        visited[entry.index()] = true;
        while let Some(&(b, i)) = stack.last() {
            let succs = &cfg.block(b).succs;
            if i < succs.len() {
                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }
                let s = succs[i];
                if !visited[s.index()] {
                    visited[s.index()] = true;
                    stack.push((s, 0));
                }
            } else {
                postorder.push(b);
                stack.pop();
            }
        }

        // Postorder number per block; unreachable blocks stay unnumbered
        // and keep no dominator.
        let mut pn: Vec<Option<u32>> = vec![None; num];
        for (i, &b) in postorder.iter().enumerate() {
            pn[b.index()] = Some(i as u32);
        }

        // doms is in postorder-number space: higher number = closer to
        // entry, which is what `intersect` walks towards.
        let mut doms: Vec<Option<u32>> = vec![None; postorder.len()];
        let entry_pn = (postorder.len() - 1) as u32;
        doms[entry_pn as usize] = Some(entry_pn);

        let mut changed = true;
        while changed {
            changed = false;
            for &b in postorder.iter().rev() {
                if b == entry {
                    continue;
                }
                let b_pn = match pn[b.index()] {
                    Some(n) => n,
                    None => continue,
                };
                let mut new_idom: Option<u32> = None;
                for &p in &cfg.block(b).preds {
                    let Some(p_pn) = pn[p.index()] else {
                        continue;
                    };
                    if doms[p_pn as usize].is_none() {
                        continue;
                    }
                    new_idom = Some(match new_idom {
                        None => p_pn,
                        Some(cur) => intersect(&doms, p_pn, cur),
                    });
                }
                if let Some(ni) = new_idom {
                    if doms[b_pn as usize] != Some(ni) {
                        doms[b_pn as usize] = Some(ni);
                        changed = true;
                    }
                }
            }
        }

        // Back into block space.
        let mut idom: Vec<Option<BlockId>> = vec![None; num];
        for &b in &postorder {
            if let Some(b_pn) = pn[b.index()] {
                if let Some(d_pn) = doms[b_pn as usize] {
                    idom[b.index()] = Some(postorder[d_pn as usize]);
                }
            }
        }

        let mut children: Vec<Vec<BlockId>> = vec![Vec::new(); num];
        for b in cfg.ids() {
            if b == entry {
                continue;
            }
            if let Some(d) = idom[b.index()] {
                children[d.index()].push(b);
            }
        }
        for list in &mut children {
            list.sort_unstable();
        }

        Self {
            idom,
            children,
            entry,
        }
    }

    /// Immediate dominator of `b`. `None` for the entry block and for
    /// unreachable blocks.
    pub fn idom(&self, b: BlockId) -> Option<BlockId> {
        match self.idom[b.index()] {
            Some(d) if d != b => Some(d),
            _ => None,
        }
    }

    /// Whether `b` is reachable from the entry block.
    pub fn is_reachable(&self, b: BlockId) -> bool {
        self.idom[b.index()].is_some()
    }

    /// Whether `a` dominates `b` (reflexively).
    pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
        let mut cur = b;
        loop {
            if cur == a {
                return true;
            }
            match self.idom[cur.index()] {
                Some(next) if next != cur => cur = next,
                _ => return false,
            }
        }
    }

    /// Dominator-tree children of `b`, ascending.
    pub fn children(&self, b: BlockId) -> &[BlockId] {
        &self.children[b.index()]
    }

    /// Dominance frontier per block, each list ascending and deduped.
    ///
    /// Cooper's per-join walk: for every join block, run each
    /// predecessor up the dominator tree until it meets the join's
    /// immediate dominator; every block passed has the join in its
    /// frontier.
    pub fn frontiers(&self, cfg: &Cfg) -> Vec<Vec<BlockId>> {
        let num = cfg.num_blocks();
        let mut df: Vec<Vec<BlockId>> = vec![Vec::new(); num];
        for b in cfg.ids() {
            let preds = &cfg.block(b).preds;
            if preds.len() < 2 {
                continue;
            }
            let Some(b_idom) = self.idom[b.index()] else {
                continue;
            };
            for &p in preds.iter() {
                let mut runner = p;
                while runner != b_idom {
                    if !self.is_reachable(runner) {
                        break;
                    }
                    df[runner.index()].push(b);
                    match self.idom[runner.index()] {
                        Some(next) if next != runner => runner = next,
                        _ => break,
                    }
                }
            }
        }
        for list in &mut df {
            list.sort_unstable();
            list.dedup();
        }
        df
    }

    /// The entry block.
    pub fn entry(&self) -> BlockId {
        self.entry
    }
}

/// CHK two-finger intersection in postorder-number space.
fn intersect(doms: &[Option<u32>], mut a: u32, mut b: u32) -> u32 {
    while a != b {
        while a < b {
            match doms[a as usize] {
                Some(n) => a = n,
                None => return b,
            }
        }
        while b < a {
            match doms[b as usize] {
                Some(n) => b = n,
                None => return a,
            }
        }
    }
    a
}

#[cfg(test)]
mod tests;
