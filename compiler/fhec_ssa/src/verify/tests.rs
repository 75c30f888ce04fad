#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use crate::build::SsaBuilder;
use crate::error::SsaVerifyError;
use crate::test_helpers::{counting_loop, diamond, fixture, ld};

use super::*;

#[test]
fn builder_output_is_clean() {
    let mut fx = fixture();
    diamond(&mut fx);
    let ssa = SsaBuilder::new(&fx.cont, &fx.reg).build().expect("builds");
    SsaVerifier::new(&fx.cont, &fx.syms, &ssa)
        .verify()
        .expect("clean");

    let mut fx2 = fixture();
    counting_loop(&mut fx2);
    let ssa2 = SsaBuilder::new(&fx2.cont, &fx2.reg).build().expect("builds");
    SsaVerifier::new(&fx2.cont, &fx2.syms, &ssa2)
        .verify()
        .expect("clean");
}

#[test]
fn detects_dominance_violation() {
    let mut fx = fixture();
    let d = diamond(&mut fx);
    let mut ssa = SsaBuilder::new(&fx.cont, &fx.reg).build().expect("builds");

    // Rewire the merge load to consume the then-arm's version directly.
    // The then block does not dominate the merge, so this must be
    // rejected.
    let v_then = ssa.def_version(d.st_then).expect("renamed");
    ssa.use_ver.insert(d.ld_merge, v_then);

    let errors = SsaVerifier::new(&fx.cont, &fx.syms, &ssa)
        .verify()
        .expect_err("broken");
    assert_eq!(
        errors,
        vec![SsaVerifyError::DominanceViolation {
            node: d.ld_merge,
            sym: d.x,
            version: ssa.version(v_then).num,
            spos: fhec_ir::Spos::NONE,
        }]
    );
}

#[test]
fn detects_phi_arity_mismatch() {
    let mut fx = fixture();
    let d = diamond(&mut fx);
    let mut ssa = SsaBuilder::new(&fx.cont, &fx.reg).build().expect("builds");

    let dropped = ssa.phis[0].args.pop();
    assert!(dropped.is_some());

    let errors = SsaVerifier::new(&fx.cont, &fx.syms, &ssa)
        .verify()
        .expect_err("broken");
    assert_eq!(
        errors,
        vec![SsaVerifyError::PhiArityMismatch {
            block: ssa.phis[0].block,
            sym: d.x,
            expected: 2,
            found: 1,
        }]
    );
}

#[test]
fn detects_version_reuse() {
    let mut fx = fixture();
    let d = diamond(&mut fx);
    let mut ssa = SsaBuilder::new(&fx.cont, &fx.reg).build().expect("builds");

    // Point both stores at one version id: two defining occurrences.
    let v_then = ssa.def_version(d.st_then).expect("renamed");
    ssa.def_ver.insert(d.st_else, v_then);

    let errors = SsaVerifier::new(&fx.cont, &fx.syms, &ssa)
        .verify()
        .expect_err("broken");
    assert!(errors.contains(&SsaVerifyError::VersionReuse {
        sym: d.x,
        version: ssa.version(v_then).num,
    }));
}

#[test]
fn detects_dangling_node_handle() {
    let mut fx = fixture();
    let d = diamond(&mut fx);
    let mut ssa = SsaBuilder::new(&fx.cont, &fx.reg).build().expect("builds");

    // A load handle from a different container cannot resolve here.
    let mut other = fixture();
    let y = crate::test_helpers::declare_var(&mut other, "y");
    let foreign = ld(&mut other, y);
    let vid = ssa.use_version(d.ld_merge).expect("renamed");
    ssa.use_ver.insert(foreign, vid);

    let errors = SsaVerifier::new(&fx.cont, &fx.syms, &ssa)
        .verify()
        .expect_err("broken");
    assert!(errors
        .iter()
        .any(|e| matches!(e, SsaVerifyError::DanglingReference(_))));
}

#[test]
fn verification_is_idempotent() {
    let mut fx = fixture();
    let d = diamond(&mut fx);
    let mut ssa = SsaBuilder::new(&fx.cont, &fx.reg).build().expect("builds");

    // Clean form: two runs, both clean.
    let verifier = SsaVerifier::new(&fx.cont, &fx.syms, &ssa);
    assert_eq!(verifier.verify(), Ok(()));
    assert_eq!(verifier.verify(), Ok(()));

    // Broken form: two runs, identical reports.
    let v_then = ssa.def_version(d.st_then).expect("renamed");
    ssa.use_ver.insert(d.ld_merge, v_then);
    let verifier = SsaVerifier::new(&fx.cont, &fx.syms, &ssa);
    let first = verifier.verify().expect_err("broken");
    let second = verifier.verify().expect_err("broken");
    assert_eq!(first, second);
}
