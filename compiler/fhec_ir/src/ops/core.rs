//! Core domain: scalar control flow, memory access, and arithmetic.
//!
//! The SSA builder keys off this domain's properties: `BEGIN_BB` and
//! `END_BB` delimit basic blocks, `LOAD`/`STORE` plus `HAS_SYM` mark
//! symbol uses and definitions.

use crate::error::IrError;
use crate::opcode::{domain, Opcode};
use crate::registry::{Arity, DomainInfo, OpcodeInfo, OpcodeProps, OpcodeRegistry, OperandKind, ResultRule};

pub const ENTRY: Opcode = Opcode::new(domain::CORE, 1);
pub const RET: Opcode = Opcode::new(domain::CORE, 2);
pub const RETV: Opcode = Opcode::new(domain::CORE, 3);
pub const LABEL: Opcode = Opcode::new(domain::CORE, 4);
pub const GOTO: Opcode = Opcode::new(domain::CORE, 5);
pub const CGOTO: Opcode = Opcode::new(domain::CORE, 6);
pub const LD: Opcode = Opcode::new(domain::CORE, 7);
pub const ST: Opcode = Opcode::new(domain::CORE, 8);
pub const LDC: Opcode = Opcode::new(domain::CORE, 9);
pub const ADD: Opcode = Opcode::new(domain::CORE, 10);
pub const SUB: Opcode = Opcode::new(domain::CORE, 11);
pub const MUL: Opcode = Opcode::new(domain::CORE, 12);
pub const NEG: Opcode = Opcode::new(domain::CORE, 13);
pub const CALL: Opcode = Opcode::new(domain::CORE, 14);

const NO_OPERANDS: &[OperandKind] = &[];
const ONE_VALUE: &[OperandKind] = &[OperandKind::Value];
const TWO_VALUES: &[OperandKind] = &[OperandKind::Value, OperandKind::Value];

static OPCODES: [OpcodeInfo; 14] = [
    OpcodeInfo {
        opcode: ENTRY,
        name: "entry",
        arity: Arity::Fixed(0),
        operands: NO_OPERANDS,
        result: ResultRule::Void,
        props: OpcodeProps::STMT
            .union(OpcodeProps::ENTRY)
            .union(OpcodeProps::BEGIN_BB)
            .union(OpcodeProps::LEAF),
    },
    OpcodeInfo {
        opcode: RET,
        name: "ret",
        arity: Arity::Fixed(0),
        operands: NO_OPERANDS,
        result: ResultRule::Void,
        props: OpcodeProps::STMT.union(OpcodeProps::END_BB),
    },
    OpcodeInfo {
        opcode: RETV,
        name: "retv",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Void,
        props: OpcodeProps::STMT.union(OpcodeProps::END_BB),
    },
    OpcodeInfo {
        opcode: LABEL,
        name: "label",
        arity: Arity::Fixed(0),
        operands: NO_OPERANDS,
        result: ResultRule::Void,
        props: OpcodeProps::STMT
            .union(OpcodeProps::BEGIN_BB)
            .union(OpcodeProps::LEAF),
    },
    OpcodeInfo {
        opcode: GOTO,
        name: "goto",
        arity: Arity::Fixed(1),
        operands: &[OperandKind::Label],
        result: ResultRule::Void,
        props: OpcodeProps::STMT.union(OpcodeProps::END_BB),
    },
    OpcodeInfo {
        opcode: CGOTO,
        name: "cgoto",
        arity: Arity::Fixed(2),
        operands: &[OperandKind::Value, OperandKind::Label],
        result: ResultRule::Void,
        props: OpcodeProps::STMT
            .union(OpcodeProps::END_BB)
            .union(OpcodeProps::FALLTHROUGH),
    },
    OpcodeInfo {
        opcode: LD,
        name: "ld",
        arity: Arity::Fixed(0),
        operands: NO_OPERANDS,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR
            .union(OpcodeProps::LOAD)
            .union(OpcodeProps::HAS_SYM)
            .union(OpcodeProps::LEAF),
    },
    OpcodeInfo {
        opcode: ST,
        name: "st",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Void,
        props: OpcodeProps::STMT
            .union(OpcodeProps::STORE)
            .union(OpcodeProps::HAS_SYM)
            .union(OpcodeProps::SIDE_EFFECT),
    },
    OpcodeInfo {
        opcode: LDC,
        name: "ldc",
        arity: Arity::Fixed(1),
        operands: &[OperandKind::Const],
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::LEAF),
    },
    OpcodeInfo {
        opcode: ADD,
        name: "add",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::COMMUTATIVE),
    },
    OpcodeInfo {
        opcode: SUB,
        name: "sub",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: MUL,
        name: "mul",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::COMMUTATIVE),
    },
    OpcodeInfo {
        opcode: NEG,
        name: "neg",
        arity: Arity::Fixed(1),
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: CALL,
        name: "call",
        arity: Arity::Variadic { min: 0 },
        operands: ONE_VALUE,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR
            .union(OpcodeProps::CALL)
            .union(OpcodeProps::SIDE_EFFECT)
            .union(OpcodeProps::HAS_SYM),
    },
];

/// Register the core domain.
pub fn register(reg: &mut OpcodeRegistry) -> Result<(), IrError> {
    reg.register_domain(
        DomainInfo {
            id: domain::CORE,
            name: "core",
        },
        &OPCODES,
    )
}
