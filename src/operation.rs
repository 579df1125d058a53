use crate::error::ExecError;
use crate::field::FieldSpec;

/// One of the eight registers an instruction's `C`/`F` pair can name:
/// the accumulator, the extension register, or one of the six index
/// registers. Analogous to the teacher's `RegisterId`, but limited to
/// the registers MIX instructions actually address (not `rJ`, which is
/// only ever a store target or a side effect of a jump).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Register {
    A,
    X,
    I1,
    I2,
    I3,
    I4,
    I5,
    I6,
}

impl Register {
    /// Registers 8..15 index rA, rI1..rI6, rX in that order (spec.md §4,
    /// opcode table); the same ordering recurs for loads, stores and
    /// compares.
    fn from_offset(offset: u8) -> Option<Register> {
        match offset {
            0 => Some(Register::A),
            1 => Some(Register::I1),
            2 => Some(Register::I2),
            3 => Some(Register::I3),
            4 => Some(Register::I4),
            5 => Some(Register::I5),
            6 => Some(Register::I6),
            7 => Some(Register::X),
            _ => None,
        }
    }

    fn offset(self) -> u8 {
        match self {
            Register::A => 0,
            Register::I1 => 1,
            Register::I2 => 2,
            Register::I3 => 3,
            Register::I4 => 4,
            Register::I5 => 5,
            Register::I6 => 6,
            Register::X => 7,
        }
    }

    /// `1..=6` for an index register, `None` for rA/rX.
    pub fn index_number(self) -> Option<u8> {
        match self {
            Register::I1 => Some(1),
            Register::I2 => Some(2),
            Register::I3 => Some(3),
            Register::I4 => Some(4),
            Register::I5 => Some(5),
            Register::I6 => Some(6),
            _ => None,
        }
    }
}

/// A store target: a general register, or one of the two special store
/// operations (STJ, STZ).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StoreTarget {
    Register(Register),
    J,
    Zero,
}

/// Shift variants of opcode 6.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShiftKind {
    Sla,
    Sra,
    Slax,
    Srax,
    Slc,
    Src,
}

/// The four I/O-family opcodes 34..=38, all stubbed per spec.md §1: units
/// are always ready and never busy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IoStub {
    Jbus,
    Ioc,
    In,
    Out,
    Jred,
}

/// The ten jump variants of opcode 39.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JumpKind {
    Jmp,
    Jsj,
    Jov,
    Jnov,
    Jl,
    Je,
    Jg,
    Jge,
    Jne,
    Jle,
}

/// The six sign tests shared by opcodes 40..=47 (jump on register sign)
/// and reused nowhere else.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SignTest {
    N,
    Z,
    P,
    Nn,
    Nz,
    Np,
}

impl SignTest {
    fn from_field(field: u8) -> Option<SignTest> {
        match field {
            0 => Some(SignTest::N),
            1 => Some(SignTest::Z),
            2 => Some(SignTest::P),
            3 => Some(SignTest::Nn),
            4 => Some(SignTest::Nz),
            5 => Some(SignTest::Np),
            _ => None,
        }
    }

    pub fn holds(self, value: i64) -> bool {
        match self {
            SignTest::N => value < 0,
            SignTest::Z => value == 0,
            SignTest::P => value > 0,
            SignTest::Nn => value >= 0,
            SignTest::Nz => value != 0,
            SignTest::Np => value <= 0,
        }
    }
}

/// The four address-transfer variants of opcodes 48..=55.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransferKind {
    Ent,
    Enn,
    Inc,
    Dec,
}

impl TransferKind {
    fn from_field(field: u8) -> Option<TransferKind> {
        match field {
            0 => Some(TransferKind::Ent),
            1 => Some(TransferKind::Enn),
            2 => Some(TransferKind::Inc),
            3 => Some(TransferKind::Dec),
            _ => None,
        }
    }
}

/// The decoded shape of an instruction's `(C, F)` pair: one flat enum
/// that the CPU executor matches on directly, with no nested `match`
/// inside any arm. This is the "single decode function, flat executor"
/// design spec.md §9 calls for; it generalizes the teacher's nested
/// `match op_code { ... match op_code_r { ... } }` dispatch
/// (`processor/core.rs`) into one level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operation {
    Nop,
    Add(FieldSpec),
    Sub(FieldSpec),
    Mul(FieldSpec),
    Div(FieldSpec),
    Num,
    Char,
    Halt,
    Shift(ShiftKind),
    Move { count: u8 },
    Load {
        register: Register,
        field: FieldSpec,
        negate: bool,
    },
    Store {
        target: StoreTarget,
        field: FieldSpec,
    },
    Io(IoStub),
    Jump(JumpKind),
    RegisterJump {
        register: Register,
        test: SignTest,
    },
    AddressTransfer {
        register: Register,
        kind: TransferKind,
    },
    Compare {
        register: Register,
        field: FieldSpec,
    },
}

/// Decode an opcode/field pair into an [`Operation`]. Fails with
/// [`ExecError::UnknownOpcode`] for opcode/field combinations TAOCP
/// leaves undefined.
pub fn decode(opcode: u8, field: u8) -> Result<Operation, ExecError> {
    let unknown = || ExecError::UnknownOpcode { opcode, field };
    let mem_field = || FieldSpec::decode(field).map_err(|_| unknown());

    match opcode {
        0 => Ok(Operation::Nop),
        1 => Ok(Operation::Add(mem_field()?)),
        2 => Ok(Operation::Sub(mem_field()?)),
        3 => Ok(Operation::Mul(mem_field()?)),
        4 => Ok(Operation::Div(mem_field()?)),
        5 => match field {
            0 => Ok(Operation::Num),
            1 => Ok(Operation::Char),
            2 => Ok(Operation::Halt),
            _ => Err(unknown()),
        },
        6 => Ok(Operation::Shift(match field {
            0 => ShiftKind::Sla,
            1 => ShiftKind::Sra,
            2 => ShiftKind::Slax,
            3 => ShiftKind::Srax,
            4 => ShiftKind::Slc,
            5 => ShiftKind::Src,
            _ => return Err(unknown()),
        })),
        7 => Ok(Operation::Move { count: field }),
        8..=23 => {
            let relative = opcode - 8;
            let register = Register::from_offset(relative % 8).ok_or_else(unknown)?;
            let negate = relative >= 8;
            Ok(Operation::Load {
                register,
                field: mem_field()?,
                negate,
            })
        }
        24..=33 => {
            let target = match opcode {
                32 => StoreTarget::J,
                33 => StoreTarget::Zero,
                _ => StoreTarget::Register(
                    Register::from_offset(opcode - 24).ok_or_else(unknown)?,
                ),
            };
            Ok(Operation::Store {
                target,
                field: mem_field()?,
            })
        }
        34 => Ok(Operation::Io(IoStub::Jbus)),
        35 => Ok(Operation::Io(IoStub::Ioc)),
        36 => Ok(Operation::Io(IoStub::In)),
        37 => Ok(Operation::Io(IoStub::Out)),
        38 => Ok(Operation::Io(IoStub::Jred)),
        39 => Ok(Operation::Jump(match field {
            0 => JumpKind::Jmp,
            1 => JumpKind::Jsj,
            2 => JumpKind::Jov,
            3 => JumpKind::Jnov,
            4 => JumpKind::Jl,
            5 => JumpKind::Je,
            6 => JumpKind::Jg,
            7 => JumpKind::Jge,
            8 => JumpKind::Jne,
            9 => JumpKind::Jle,
            _ => return Err(unknown()),
        })),
        40..=47 => {
            let register = Register::from_offset(opcode - 40).ok_or_else(unknown)?;
            let test = SignTest::from_field(field).ok_or_else(unknown)?;
            Ok(Operation::RegisterJump { register, test })
        }
        48..=55 => {
            let register = Register::from_offset(opcode - 48).ok_or_else(unknown)?;
            let kind = TransferKind::from_field(field).ok_or_else(unknown)?;
            Ok(Operation::AddressTransfer { register, kind })
        }
        56..=63 => {
            let register = Register::from_offset(opcode - 56).ok_or_else(unknown)?;
            Ok(Operation::Compare {
                register,
                field: mem_field()?,
            })
        }
        _ => Err(unknown()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nop_decodes_regardless_of_field() {
        assert_eq!(decode(0, 0).unwrap(), Operation::Nop);
    }

    #[test]
    fn halt_is_opcode_five_field_two() {
        assert_eq!(decode(5, 2).unwrap(), Operation::Halt);
    }

    #[test]
    fn stj_defaults_to_zero_two() {
        let op = decode(32, 2).unwrap();
        match op {
            Operation::Store { target, field } => {
                assert_eq!(target, StoreTarget::J);
                assert_eq!(field, FieldSpec::new(0, 2).unwrap());
            }
            _ => panic!("expected a Store operation"),
        }
    }

    #[test]
    fn load_family_covers_all_eight_registers_plus_negate() {
        assert_eq!(
            decode(8, 5).unwrap(),
            Operation::Load {
                register: Register::A,
                field: FieldSpec::whole(),
                negate: false
            }
        );
        assert_eq!(
            decode(16, 5).unwrap(),
            Operation::Load {
                register: Register::A,
                field: FieldSpec::whole(),
                negate: true
            }
        );
        assert_eq!(
            decode(15, 5).unwrap(),
            Operation::Load {
                register: Register::X,
                field: FieldSpec::whole(),
                negate: false
            }
        );
    }

    #[test]
    fn register_jump_family_spans_opcodes_forty_to_forty_seven() {
        assert_eq!(
            decode(40, 0).unwrap(),
            Operation::RegisterJump {
                register: Register::A,
                test: SignTest::N
            }
        );
        assert_eq!(
            decode(47, 5).unwrap(),
            Operation::RegisterJump {
                register: Register::X,
                test: SignTest::Np
            }
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(decode(5, 9).is_err());
        assert!(decode(39, 10).is_err());
    }
}
