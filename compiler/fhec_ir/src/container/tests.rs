#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use crate::error::IrError;
use crate::node::Operand;
use crate::opcode::{domain, Opcode};
use crate::ops::core;
use crate::registry::{Arity, OperandKind};
use crate::spos::Spos;
use crate::test_helpers::{declare_var, fixture};

#[test]
fn create_node_round_trip() {
    let mut fx = fixture();
    let x = declare_var(&mut fx, "x");
    let c = fx.consts.intern_int(7, fx.i64_ty);

    let ldc = fx
        .cont
        .append_node(
            &fx.reg,
            core::LDC,
            &[Operand::Const(c)],
            fx.i64_ty,
            None,
            Spos::new(1, 3, 5),
        )
        .expect("valid ldc");
    let st = fx
        .cont
        .append_node(
            &fx.reg,
            core::ST,
            &[Operand::Node(ldc)],
            fx.void_ty,
            Some(x),
            Spos::NONE,
        )
        .expect("valid st");

    let node = fx.cont.node(st).expect("live handle");
    assert_eq!(node.opcode, core::ST);
    assert_eq!(node.operands.as_slice(), &[Operand::Node(ldc)]);
    assert_eq!(node.sym, Some(x));

    let ldc_node = fx.cont.node(ldc).expect("live handle");
    assert_eq!(ldc_node.spos, Spos::new(1, 3, 5));
    assert_eq!(fx.cont.code(), &[ldc, st]);
}

#[test]
fn arity_mismatch_allocates_nothing() {
    let mut fx = fixture();
    let before = fx.cont.num_nodes();
    let _ret = fx
        .cont
        .new_node(&fx.reg, core::RET, &[], fx.void_ty, None, Spos::NONE)
        .expect("ret is valid");

    let result = fx.cont.new_node(
        &fx.reg,
        core::RETV,
        &[],
        fx.void_ty,
        None,
        Spos::NONE,
    );
    assert_eq!(
        result,
        Err(IrError::ArityMismatch {
            opcode: core::RETV,
            expected: Arity::Fixed(1),
            found: 0,
        })
    );
    // Only the valid ret was allocated.
    assert_eq!(fx.cont.num_nodes(), before + 1);
}

#[test]
fn operand_kind_mismatch_rejected() {
    let mut fx = fixture();
    let c = fx.consts.intern_int(1, fx.i64_ty);
    let result = fx.cont.new_node(
        &fx.reg,
        core::ADD,
        &[Operand::Const(c), Operand::Const(c)],
        fx.i64_ty,
        None,
        Spos::NONE,
    );
    assert_eq!(
        result,
        Err(IrError::OperandKindMismatch {
            opcode: core::ADD,
            index: 0,
            expected: OperandKind::Value,
            found: OperandKind::Const,
        })
    );
}

#[test]
fn missing_symbol_ref_rejected() {
    let mut fx = fixture();
    let result = fx
        .cont
        .new_node(&fx.reg, core::LD, &[], fx.i64_ty, None, Spos::NONE);
    assert_eq!(result, Err(IrError::MissingSymbolRef { opcode: core::LD }));
}

#[test]
fn foreign_node_operand_rejected() {
    let mut fx = fixture();
    let mut other = fixture();
    let x = declare_var(&mut other, "x");
    let foreign_ld = other
        .cont
        .new_node(&other.reg, core::LD, &[], other.i64_ty, Some(x), Spos::NONE)
        .expect("valid in its own container");

    let result = fx.cont.new_node(
        &fx.reg,
        core::NEG,
        &[Operand::Node(foreign_ld)],
        fx.i64_ty,
        None,
        Spos::NONE,
    );
    assert!(matches!(result, Err(IrError::DanglingReference(_))));
}

#[test]
fn unknown_opcode_rejected() {
    let mut fx = fixture();
    let bogus = Opcode::new(domain::CORE, 900);
    assert_eq!(
        fx.cont
            .new_node(&fx.reg, bogus, &[], fx.void_ty, None, Spos::NONE),
        Err(IrError::UnknownOpcode { opcode: bogus })
    );
}

#[test]
fn entry_node_recorded() {
    let mut fx = fixture();
    assert_eq!(fx.cont.entry(), None);
    let entry = fx
        .cont
        .append_node(&fx.reg, core::ENTRY, &[], fx.void_ty, None, Spos::NONE)
        .expect("valid entry");
    assert_eq!(fx.cont.entry(), Some(entry));
}

#[test]
fn dump_names_ops_and_symbols() {
    let mut fx = fixture();
    let x = declare_var(&mut fx, "x");
    let ld = fx
        .cont
        .append_node(&fx.reg, core::LD, &[], fx.i64_ty, Some(x), Spos::NONE)
        .expect("valid ld");
    fx.cont
        .append_node(
            &fx.reg,
            core::ST,
            &[Operand::Node(ld)],
            fx.void_ty,
            Some(x),
            Spos::NONE,
        )
        .expect("valid st");

    let dump = fx.cont.dump(&fx.reg, &fx.syms);
    assert!(dump.contains("ld"), "dump was: {dump}");
    assert!(dump.contains("st"), "dump was: {dump}");
    assert!(dump.contains("[x]"), "dump was: {dump}");
}
