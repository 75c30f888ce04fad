//! Scheme domain: scheme-agnostic homomorphic-encryption operations.
//!
//! These operate on `cipher`/`cipher3`/`plain` typed values. Scale and
//! level management is a separate pass's policy; the opcodes only name
//! the primitive the runtime must provide.

use crate::error::IrError;
use crate::opcode::{domain, Opcode};
use crate::registry::{Arity, DomainInfo, OpcodeInfo, OpcodeProps, OpcodeRegistry, OperandKind, ResultRule};

pub const ENCODE: Opcode = Opcode::new(domain::SCHEME, 1);
pub const ADD: Opcode = Opcode::new(domain::SCHEME, 2);
pub const MUL: Opcode = Opcode::new(domain::SCHEME, 3);
pub const ROTATE: Opcode = Opcode::new(domain::SCHEME, 4);
pub const RESCALE: Opcode = Opcode::new(domain::SCHEME, 5);
/// Reduce a three-component ciphertext back to two components.
pub const RELIN: Opcode = Opcode::new(domain::SCHEME, 6);
pub const MODSWITCH: Opcode = Opcode::new(domain::SCHEME, 7);
pub const BOOTSTRAP: Opcode = Opcode::new(domain::SCHEME, 8);

const ONE_VALUE: &[OperandKind] = &[OperandKind::Value];
const TWO_VALUES: &[OperandKind] = &[OperandKind::Value, OperandKind::Value];

static OPCODES: [OpcodeInfo; 8] = [
    OpcodeInfo {
        opcode: ENCODE,
        name: "he.encode",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: ADD,
        name: "he.add",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::COMMUTATIVE),
    },
    OpcodeInfo {
        opcode: MUL,
        name: "he.mul",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::COMMUTATIVE),
    },
    OpcodeInfo {
        opcode: ROTATE,
        name: "he.rotate",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: RESCALE,
        name: "he.rescale",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: RELIN,
        name: "he.relin",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: MODSWITCH,
        name: "he.modswitch",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: BOOTSTRAP,
        name: "he.bootstrap",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
];

/// Register the scheme domain.
pub fn register(reg: &mut OpcodeRegistry) -> Result<(), IrError> {
    reg.register_domain(
        DomainInfo {
            id: domain::SCHEME,
            name: "scheme",
        },
        &OPCODES,
    )
}
