//! Polynomial domain: operations below the scheme IR.

use crate::error::IrError;
use crate::opcode::{domain, Opcode};
use crate::registry::{Arity, DomainInfo, OpcodeInfo, OpcodeProps, OpcodeRegistry, OperandKind, ResultRule};

pub const ADD: Opcode = Opcode::new(domain::POLY, 1);
pub const MUL: Opcode = Opcode::new(domain::POLY, 2);
pub const NTT: Opcode = Opcode::new(domain::POLY, 3);
pub const INTT: Opcode = Opcode::new(domain::POLY, 4);
pub const MOD_UP: Opcode = Opcode::new(domain::POLY, 5);
pub const MOD_DOWN: Opcode = Opcode::new(domain::POLY, 6);

const ONE_VALUE: &[OperandKind] = &[OperandKind::Value];
const TWO_VALUES: &[OperandKind] = &[OperandKind::Value, OperandKind::Value];

static OPCODES: [OpcodeInfo; 6] = [
    OpcodeInfo {
        opcode: ADD,
        name: "p.add",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::COMMUTATIVE),
    },
    OpcodeInfo {
        opcode: MUL,
        name: "p.mul",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::COMMUTATIVE),
    },
    OpcodeInfo {
        opcode: NTT,
        name: "p.ntt",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: INTT,
        name: "p.intt",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: MOD_UP,
        name: "p.modup",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: MOD_DOWN,
        name: "p.moddown",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
];

/// Register the polynomial domain.
pub fn register(reg: &mut OpcodeRegistry) -> Result<(), IrError> {
    reg.register_domain(
        DomainInfo {
            id: domain::POLY,
            name: "poly",
        },
        &OPCODES,
    )
}
