#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use crate::error::IrError;
use crate::node::Operand;
use crate::opcode::domain;
use crate::ops::{core, scheme};
use crate::spos::Spos;
use crate::test_helpers::{declare_var, fixture};

use super::*;

/// Pass context counting the loads it sees.
#[derive(Default)]
struct Counter {
    loads: usize,
}

fn count_load(cx: &mut Counter, _cont: &Container, _node: NodeHandle) -> Result<(), IrError> {
    cx.loads += 1;
    Ok(())
}

#[test]
fn registered_handler_is_called() {
    let mut fx = fixture();
    let x = declare_var(&mut fx, "x");
    let ld = fx
        .cont
        .new_node(&fx.reg, core::LD, &[], fx.i64_ty, Some(x), Spos::NONE)
        .expect("valid ld");

    let mut table: DispatchTable<Counter, ()> = DispatchTable::new();
    table.register_domain(domain::CORE, HandlerEntry::Default);
    table.register(core::LD, HandlerEntry::Handler(count_load));

    let mut cx = Counter::default();
    table.dispatch(&mut cx, &fx.cont, ld).expect("handled");
    assert_eq!(cx.loads, 1);
}

#[test]
fn default_entry_recurses_into_value_operands() {
    let mut fx = fixture();
    let x = declare_var(&mut fx, "x");
    let y = declare_var(&mut fx, "y");
    let ld_x = fx
        .cont
        .new_node(&fx.reg, core::LD, &[], fx.i64_ty, Some(x), Spos::NONE)
        .expect("valid ld");
    let ld_y = fx
        .cont
        .new_node(&fx.reg, core::LD, &[], fx.i64_ty, Some(y), Spos::NONE)
        .expect("valid ld");
    let add = fx
        .cont
        .new_node(
            &fx.reg,
            core::ADD,
            &[Operand::Node(ld_x), Operand::Node(ld_y)],
            fx.i64_ty,
            None,
            Spos::NONE,
        )
        .expect("valid add");

    let mut table: DispatchTable<Counter, ()> = DispatchTable::new();
    table.register_domain(domain::CORE, HandlerEntry::Default);
    table.register(core::LD, HandlerEntry::Handler(count_load));

    let mut cx = Counter::default();
    table.dispatch(&mut cx, &fx.cont, add).expect("handled");
    assert_eq!(cx.loads, 2);
}

#[test]
fn null_entry_discards_a_domain() {
    let mut fx = fixture();
    let x = declare_var(&mut fx, "x");
    let ld = fx
        .cont
        .new_node(&fx.reg, core::LD, &[], fx.i64_ty, Some(x), Spos::NONE)
        .expect("valid ld");
    let enc = fx
        .cont
        .new_node(
            &fx.reg,
            scheme::ENCODE,
            &[Operand::Node(ld)],
            fx.i64_ty,
            None,
            Spos::NONE,
        )
        .expect("valid encode");

    let mut table: DispatchTable<Counter, ()> = DispatchTable::new();
    table.register_domain(domain::SCHEME, HandlerEntry::Null);

    // The null entry does not even recurse, so the core load below the
    // scheme node is never visited.
    let mut cx = Counter::default();
    table.dispatch(&mut cx, &fx.cont, enc).expect("no-op");
    assert_eq!(cx.loads, 0);
}

#[test]
fn invalid_entry_and_unregistered_domain_error() {
    let mut fx = fixture();
    let x = declare_var(&mut fx, "x");
    let ld = fx
        .cont
        .new_node(&fx.reg, core::LD, &[], fx.i64_ty, Some(x), Spos::NONE)
        .expect("valid ld");

    // Explicit invalid entry.
    let mut table: DispatchTable<Counter, ()> = DispatchTable::new();
    table.register_domain(domain::CORE, HandlerEntry::Invalid);
    let mut cx = Counter::default();
    assert_eq!(
        table.dispatch(&mut cx, &fx.cont, ld),
        Err(IrError::UnexpectedOpcode { opcode: core::LD })
    );

    // Unregistered domain behaves identically.
    let empty: DispatchTable<Counter, ()> = DispatchTable::new();
    assert_eq!(
        empty.dispatch(&mut cx, &fx.cont, ld),
        Err(IrError::UnexpectedOpcode { opcode: core::LD })
    );
}
