#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use crate::cfg::{BlockId, Cfg};
use crate::test_helpers::{counting_loop, diamond, entry, fixture, goto, label, place, ret};

use super::*;

fn ids4() -> (BlockId, BlockId, BlockId, BlockId) {
    (
        BlockId::new(0),
        BlockId::new(1),
        BlockId::new(2),
        BlockId::new(3),
    )
}

#[test]
fn diamond_dominators() {
    let mut fx = fixture();
    diamond(&mut fx);
    let cfg = Cfg::build(&fx.cont, &fx.reg).expect("builds");
    let dom = DomTree::build(&cfg);
    let (b0, b1, b2, b3) = ids4();

    assert_eq!(dom.idom(b0), None);
    assert_eq!(dom.idom(b1), Some(b0));
    assert_eq!(dom.idom(b2), Some(b0));
    // The merge is dominated by the fork, not by either arm.
    assert_eq!(dom.idom(b3), Some(b0));

    assert!(dom.dominates(b0, b3));
    assert!(dom.dominates(b3, b3));
    assert!(!dom.dominates(b1, b3));
    assert!(!dom.dominates(b2, b1));

    assert_eq!(dom.children(b0), &[b1, b2, b3]);
    assert!(dom.children(b1).is_empty());
}

#[test]
fn diamond_frontiers() {
    let mut fx = fixture();
    diamond(&mut fx);
    let cfg = Cfg::build(&fx.cont, &fx.reg).expect("builds");
    let dom = DomTree::build(&cfg);
    let (b0, b1, b2, b3) = ids4();

    let df = dom.frontiers(&cfg);
    assert!(df[b0.index()].is_empty());
    assert_eq!(df[b1.index()], vec![b3]);
    assert_eq!(df[b2.index()], vec![b3]);
    assert!(df[b3.index()].is_empty());
}

#[test]
fn loop_dominators_and_frontiers() {
    let mut fx = fixture();
    counting_loop(&mut fx);
    let cfg = Cfg::build(&fx.cont, &fx.reg).expect("builds");
    let dom = DomTree::build(&cfg);
    let (b0, b1, b2, b3) = ids4();

    // The header dominates both the body and the exit; the body
    // dominates nothing else.
    assert_eq!(dom.idom(b2), Some(b0));
    assert_eq!(dom.idom(b1), Some(b2));
    assert_eq!(dom.idom(b3), Some(b2));
    assert_eq!(dom.children(b2), &[b1, b3]);

    let df = dom.frontiers(&cfg);
    assert_eq!(df[b1.index()], vec![b2]);
    // The header is in its own frontier via the back edge.
    assert_eq!(df[b2.index()], vec![b2]);
    assert!(df[b0.index()].is_empty());
}

#[test]
fn unreachable_block_has_no_dominator() {
    let mut fx = fixture();
    let l = label(&mut fx);
    entry(&mut fx);
    goto(&mut fx, l);
    // Dead block: nothing branches here.
    ret(&mut fx);
    place(&mut fx, l);
    ret(&mut fx);

    let cfg = Cfg::build(&fx.cont, &fx.reg).expect("builds");
    let dom = DomTree::build(&cfg);
    let dead = BlockId::new(1);

    assert_eq!(cfg.num_blocks(), 3);
    assert!(cfg.block(dead).preds.is_empty());
    assert!(!dom.is_reachable(dead));
    assert_eq!(dom.idom(dead), None);
    assert!(!dom.dominates(dom.entry(), dead));
    assert!(dom.dominates(dom.entry(), BlockId::new(2)));
}
