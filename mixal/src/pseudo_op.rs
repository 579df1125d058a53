//! The five pseudo-operations (spec.md §4.3): `ORIG`, `EQU`, `CON`,
//! `ALF`, `END`. A tiny closed enum, so it is the one place in this
//! crate that reaches for `util-derive`'s `EnumFromStr` the way the
//! teacher's enums (`Opcode`, `AluFunct`, ...) do, rather than a
//! hand-matched table as the much larger instruction mnemonic set
//! (`opcodes.rs`) uses.

use util::EnumFromStr;

#[derive(Clone, Copy, PartialEq, Eq, Debug, util_derive::EnumFromStr)]
#[allow(non_camel_case_types)]
pub enum PseudoOp {
    ORIG,
    EQU,
    CON,
    ALF,
    END,
}
