//! Shared test fixtures: small functions with known control flow.
//!
//! Only compiled in test builds.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use fhec_ir::ops::core;
use fhec_ir::{Container, NodeHandle, Operand, OpcodeRegistry, Spos};
use fhec_sym::{
    ConstTable, PrimType, ScopeId, SymHandle, SymbolKind, SymbolTable, TypeHandle, TypeTable,
};

pub(crate) struct Fixture {
    pub reg: OpcodeRegistry,
    pub syms: SymbolTable,
    pub types: TypeTable,
    pub consts: ConstTable,
    pub cont: Container,
    pub i64_ty: TypeHandle,
    pub void_ty: TypeHandle,
}

pub(crate) fn fixture() -> Fixture {
    let reg = OpcodeRegistry::with_default_domains();
    let mut syms = SymbolTable::new();
    let mut types = TypeTable::new();
    let consts = ConstTable::new();
    let i64_ty = types.prim(PrimType::Int64);
    let void_ty = types.prim(PrimType::Void);
    let scope = syms.new_scope(ScopeId::GLOBAL);
    let name = syms.intern("f");
    let cont = Container::new(name, scope);
    Fixture {
        reg,
        syms,
        types,
        consts,
        cont,
        i64_ty,
        void_ty,
    }
}

pub(crate) fn declare_var(fx: &mut Fixture, name: &str) -> SymHandle {
    fx.syms
        .declare_named(name, SymbolKind::Variable, fx.i64_ty, fx.cont.scope())
        .expect("fresh variable")
}

pub(crate) fn entry(fx: &mut Fixture) -> NodeHandle {
    fx.cont
        .append_node(&fx.reg, core::ENTRY, &[], fx.void_ty, None, Spos::NONE)
        .expect("entry")
}

/// Create a label node without linking it; `place` links it later so
/// branches can be built before their targets.
pub(crate) fn label(fx: &mut Fixture) -> NodeHandle {
    fx.cont
        .new_node(&fx.reg, core::LABEL, &[], fx.void_ty, None, Spos::NONE)
        .expect("label")
}

pub(crate) fn place(fx: &mut Fixture, l: NodeHandle) {
    fx.cont.append(l).expect("label resolves");
}

pub(crate) fn ldc(fx: &mut Fixture, v: i64) -> NodeHandle {
    let c = fx.consts.intern_int(v, fx.i64_ty);
    fx.cont
        .new_node(
            &fx.reg,
            core::LDC,
            &[Operand::Const(c)],
            fx.i64_ty,
            None,
            Spos::NONE,
        )
        .expect("ldc")
}

pub(crate) fn ld(fx: &mut Fixture, sym: SymHandle) -> NodeHandle {
    fx.cont
        .new_node(&fx.reg, core::LD, &[], fx.i64_ty, Some(sym), Spos::NONE)
        .expect("ld")
}

pub(crate) fn add(fx: &mut Fixture, a: NodeHandle, b: NodeHandle) -> NodeHandle {
    fx.cont
        .new_node(
            &fx.reg,
            core::ADD,
            &[Operand::Node(a), Operand::Node(b)],
            fx.i64_ty,
            None,
            Spos::NONE,
        )
        .expect("add")
}

pub(crate) fn st(fx: &mut Fixture, sym: SymHandle, val: NodeHandle) -> NodeHandle {
    fx.cont
        .append_node(
            &fx.reg,
            core::ST,
            &[Operand::Node(val)],
            fx.void_ty,
            Some(sym),
            Spos::NONE,
        )
        .expect("st")
}

pub(crate) fn goto(fx: &mut Fixture, target: NodeHandle) -> NodeHandle {
    fx.cont
        .append_node(
            &fx.reg,
            core::GOTO,
            &[Operand::Label(target)],
            fx.void_ty,
            None,
            Spos::NONE,
        )
        .expect("goto")
}

pub(crate) fn cgoto(fx: &mut Fixture, cond: NodeHandle, target: NodeHandle) -> NodeHandle {
    fx.cont
        .append_node(
            &fx.reg,
            core::CGOTO,
            &[Operand::Node(cond), Operand::Label(target)],
            fx.void_ty,
            None,
            Spos::NONE,
        )
        .expect("cgoto")
}

pub(crate) fn ret(fx: &mut Fixture) -> NodeHandle {
    fx.cont
        .append_node(&fx.reg, core::RET, &[], fx.void_ty, None, Spos::NONE)
        .expect("ret")
}

pub(crate) fn retv(fx: &mut Fixture, val: NodeHandle) -> NodeHandle {
    fx.cont
        .append_node(
            &fx.reg,
            core::RETV,
            &[Operand::Node(val)],
            fx.void_ty,
            None,
            Spos::NONE,
        )
        .expect("retv")
}

/// If/else diamond over one variable:
///
/// ```text
/// b0: entry; cgoto c -> b2      b1: st x <- 10; goto b3
/// b2: label; st x <- 20; goto b3
/// b3: label; retv (ld x)
/// ```
pub(crate) struct Diamond {
    pub x: SymHandle,
    pub st_else: NodeHandle,
    pub st_then: NodeHandle,
    pub ld_merge: NodeHandle,
}

pub(crate) fn diamond(fx: &mut Fixture) -> Diamond {
    let x = declare_var(fx, "x");
    let l_then = label(fx);
    let l_merge = label(fx);

    entry(fx);
    let cond = ldc(fx, 1);
    cgoto(fx, cond, l_then);

    let ten = ldc(fx, 10);
    let st_else = st(fx, x, ten);
    goto(fx, l_merge);

    place(fx, l_then);
    let twenty = ldc(fx, 20);
    let st_then = st(fx, x, twenty);
    goto(fx, l_merge);

    place(fx, l_merge);
    let ld_merge = ld(fx, x);
    retv(fx, ld_merge);

    Diamond {
        x,
        st_else,
        st_then,
        ld_merge,
    }
}

/// Counting loop over one variable:
///
/// ```text
/// b0: entry; st x <- 0; goto b2
/// b1: label; st x <- (ld x) + 1; goto b2
/// b2: label; cgoto (ld x) -> b1
/// b3: retv (ld x)
/// ```
pub(crate) struct Loop {
    pub x: SymHandle,
    pub st_init: NodeHandle,
    pub st_body: NodeHandle,
    pub ld_body: NodeHandle,
    pub ld_cond: NodeHandle,
    pub ld_exit: NodeHandle,
}

pub(crate) fn counting_loop(fx: &mut Fixture) -> Loop {
    let x = declare_var(fx, "x");
    let l_body = label(fx);
    let l_head = label(fx);

    entry(fx);
    let zero = ldc(fx, 0);
    let st_init = st(fx, x, zero);
    goto(fx, l_head);

    place(fx, l_body);
    let ld_body = ld(fx, x);
    let one = ldc(fx, 1);
    let sum = add(fx, ld_body, one);
    let st_body = st(fx, x, sum);
    goto(fx, l_head);

    place(fx, l_head);
    let ld_cond = ld(fx, x);
    cgoto(fx, ld_cond, l_body);

    let ld_exit = ld(fx, x);
    retv(fx, ld_exit);

    Loop {
        x,
        st_init,
        st_body,
        ld_body,
        ld_cond,
        ld_exit,
    }
}
