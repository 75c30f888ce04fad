//! Vector domain: SIMD-width operations produced by tensor lowering.

use crate::error::IrError;
use crate::opcode::{domain, Opcode};
use crate::registry::{Arity, DomainInfo, OpcodeInfo, OpcodeProps, OpcodeRegistry, OperandKind, ResultRule};

pub const ADD: Opcode = Opcode::new(domain::VECTOR, 1);
pub const MUL: Opcode = Opcode::new(domain::VECTOR, 2);
/// Cyclic rotation of vector lanes; the second operand is the shift.
pub const ROLL: Opcode = Opcode::new(domain::VECTOR, 3);
/// Extract a contiguous lane range: (base, start, size).
pub const SLICE: Opcode = Opcode::new(domain::VECTOR, 4);
pub const RESHAPE: Opcode = Opcode::new(domain::VECTOR, 5);

const TWO_VALUES: &[OperandKind] = &[OperandKind::Value, OperandKind::Value];

static OPCODES: [OpcodeInfo; 5] = [
    OpcodeInfo {
        opcode: ADD,
        name: "v.add",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::COMMUTATIVE),
    },
    OpcodeInfo {
        opcode: MUL,
        name: "v.mul",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR.union(OpcodeProps::COMMUTATIVE),
    },
    OpcodeInfo {
        opcode: ROLL,
        name: "v.roll",
        arity: Arity::Fixed(2),
        operands: TWO_VALUES,
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: SLICE,
        name: "v.slice",
        arity: Arity::Fixed(3),
        operands: &[OperandKind::Value, OperandKind::Value, OperandKind::Value],
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
    OpcodeInfo {
        opcode: RESHAPE,
        name: "v.reshape",
        arity: Arity::Fixed(1),
        operands: &[OperandKind::Value],
        result: ResultRule::Declared,
        props: OpcodeProps::EXPR,
    },
];

/// Register the vector domain.
pub fn register(reg: &mut OpcodeRegistry) -> Result<(), IrError> {
    reg.register_domain(
        DomainInfo {
            id: domain::VECTOR,
            name: "vector",
        },
        &OPCODES,
    )
}
