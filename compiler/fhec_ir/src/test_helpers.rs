//! Shared test fixtures for container and dispatch tests.
//!
//! Only compiled in test builds.

use fhec_sym::{PrimType, ScopeId, SymbolKind, SymbolTable, TypeHandle, TypeTable};

use crate::container::Container;
use crate::registry::OpcodeRegistry;

pub(crate) struct Fixture {
    pub reg: OpcodeRegistry,
    pub syms: SymbolTable,
    pub types: TypeTable,
    pub consts: fhec_sym::ConstTable,
    pub cont: Container,
    pub i64_ty: TypeHandle,
    pub void_ty: TypeHandle,
}

/// Build a registry with the shipped domains, fresh tables, and an empty
/// container named `f` with its own function scope.
pub(crate) fn fixture() -> Fixture {
    let reg = OpcodeRegistry::with_default_domains();
    let mut syms = SymbolTable::new();
    let mut types = TypeTable::new();
    let consts = fhec_sym::ConstTable::new();
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

/// Declare an `i64` variable in the container's scope.
pub(crate) fn declare_var(fx: &mut Fixture, name: &str) -> fhec_sym::SymHandle {
    #[allow(clippy::expect_used)]
    fx.syms
        .declare_named(name, SymbolKind::Variable, fx.i64_ty, fx.cont.scope())
        .expect("fresh variable")
}
