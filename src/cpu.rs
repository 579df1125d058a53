//! The fetch-decode-execute engine. `Cpu` owns a [`Machine`] and drives
//! it one instruction at a time; `Machine` is pure state. This mirrors
//! the teacher's `Processor`/`Core` split (`processor/mod.rs`), adapted
//! to MIX's sign-magnitude word instead of a two's-complement one.

use crate::error::ExecError;
use crate::field::FieldSpec;
use crate::instruction::Instruction;
use crate::machine::{Comparison, Machine, RunState};
use crate::operation::{self, IoStub, JumpKind, Operation, Register, ShiftKind, StoreTarget, TransferKind};
use crate::registers::INDEX_MAX;
use crate::sign::Sign;
use crate::word::{Word, MAX};
use std::convert::TryFrom;

/// `MAX + 1`: the modulus arithmetic wraps into on overflow, and the
/// base MUL/DIV split a ten-byte product/dividend across `rA`/`rX`.
const BASE: i64 = MAX + 1;

pub struct Cpu {
    pub machine: Machine,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            machine: Machine::new(),
        }
    }

    /// Execute a single instruction at the current program counter.
    /// Returns `Ok(())` having advanced (or jumped) the program counter,
    /// even when the instruction just executed was `HLT`.
    pub fn step(&mut self) -> Result<(), ExecError> {
        let pc = self.machine.program_counter;
        let word = self.machine.read(i64::from(pc))?;
        let instr = Instruction::from_word(word);
        let operation = operation::decode(instr.opcode, instr.field)?;
        let m = self.effective_address(instr)?;
        let next = pc.wrapping_add(1);

        self.execute(operation, m, pc, next)
    }

    /// Run until `HLT` or `instruction_limit` instructions have executed
    /// without halting.
    pub fn run(&mut self, instruction_limit: u64) -> Result<(), ExecError> {
        let mut executed = 0u64;
        while self.machine.state == RunState::Running {
            if executed >= instruction_limit {
                return Err(ExecError::InstructionLimitExceeded {
                    limit: instruction_limit,
                });
            }
            self.step()?;
            executed += 1;
        }
        Ok(())
    }

    fn effective_address(&self, instr: Instruction) -> Result<i64, ExecError> {
        if instr.index > 6 {
            return Err(ExecError::UnknownOpcode {
                opcode: instr.opcode,
                field: instr.field,
            });
        }
        let index_value = if instr.index == 0 {
            0
        } else {
            self.machine.registers.index(instr.index).to_int()
        };
        Ok(i64::from(instr.signed_address()) + index_value)
    }

    fn execute(
        &mut self,
        operation: Operation,
        m: i64,
        pc: u16,
        next: u16,
    ) -> Result<(), ExecError> {
        match operation {
            Operation::Nop => {
                self.machine.program_counter = next;
            }
            Operation::Add(field) => {
                self.arithmetic(field, m, next, |a, operand| a + operand)?;
            }
            Operation::Sub(field) => {
                self.arithmetic(field, m, next, |a, operand| a - operand)?;
            }
            Operation::Mul(field) => {
                self.multiply(field, m, next)?;
            }
            Operation::Div(field) => {
                self.divide(field, m, next)?;
            }
            Operation::Num => {
                self.num(next);
            }
            Operation::Char => {
                self.char(next);
            }
            Operation::Halt => {
                self.machine.state = RunState::Halted;
                self.machine.program_counter = next;
            }
            Operation::Shift(kind) => {
                self.shift(kind, m, next);
            }
            Operation::Move { count } => {
                self.move_words(m, count, next)?;
            }
            Operation::Load {
                register,
                field,
                negate,
            } => {
                self.load(register, field, negate, m, next)?;
            }
            Operation::Store { target, field } => {
                self.store(target, field, m, next)?;
            }
            Operation::Io(stub) => {
                self.io(stub, m, pc, next);
            }
            Operation::Jump(kind) => {
                self.jump(kind, m, pc, next);
            }
            Operation::RegisterJump { register, test } => {
                let value = self.machine.registers.get(register).to_int();
                self.branch(test.holds(value), m, pc, next);
            }
            Operation::AddressTransfer { register, kind } => {
                self.address_transfer(register, kind, m, next);
            }
            Operation::Compare { register, field } => {
                self.compare(register, field, m, next)?;
            }
        }
        Ok(())
    }

    fn arithmetic(
        &mut self,
        field: FieldSpec,
        m: i64,
        next: u16,
        combine: impl Fn(i64, i64) -> i64,
    ) -> Result<(), ExecError> {
        let operand = self.machine.read(m)?.slice_spec(field).to_int();
        let a = self.machine.registers.a.to_int();
        let raw = combine(a, operand);
        let magnitude = raw.abs();
        let wrapped = if magnitude > MAX {
            self.machine.overflow = true;
            magnitude % BASE
        } else {
            magnitude
        };
        let signed = if raw < 0 { -wrapped } else { wrapped };
        self.machine.registers.a = Word::from_int(signed).unwrap_or(Word::ZERO);
        self.machine.program_counter = next;
        Ok(())
    }

    fn multiply(&mut self, field: FieldSpec, m: i64, next: u16) -> Result<(), ExecError> {
        let operand = self.machine.read(m)?.slice_spec(field).to_int();
        let a = self.machine.registers.a.to_int();
        let product = i128::from(a) * i128::from(operand);
        let sign = if product < 0 { Sign::Minus } else { Sign::Plus };
        let magnitude = product.unsigned_abs();
        let base = BASE as u128;
        let high = (magnitude / base) as i64;
        let low = (magnitude % base) as i64;
        self.machine.registers.a =
            Word::from_int(sign.multiplier() * high).unwrap_or(Word::ZERO);
        self.machine.registers.x =
            Word::from_int(sign.multiplier() * low).unwrap_or(Word::ZERO);
        self.machine.program_counter = next;
        Ok(())
    }

    fn divide(&mut self, field: FieldSpec, m: i64, next: u16) -> Result<(), ExecError> {
        let divisor = self.machine.read(m)?.slice_spec(field).to_int();
        if divisor == 0 {
            self.machine.overflow = true;
            self.machine.program_counter = next;
            return Ok(());
        }

        let a = self.machine.registers.a.to_int();
        let x = self.machine.registers.x.to_int();
        let a_sign = self.machine.registers.a.sign().multiplier();
        let dividend = a_sign * (i128::from(a.abs()) * i128::from(BASE) + i128::from(x.abs()));
        let divisor = i128::from(divisor);

        let quotient = dividend / divisor;
        let remainder = dividend % divisor;

        if quotient.unsigned_abs() > u128::try_from(MAX).unwrap() {
            self.machine.overflow = true;
        } else {
            self.machine.registers.a = Word::from_int(quotient as i64).unwrap_or(Word::ZERO);
            self.machine.registers.x = Word::from_int(remainder as i64).unwrap_or(Word::ZERO);
        }
        self.machine.program_counter = next;
        Ok(())
    }

    /// NUM: fold all ten bytes of `rA || rX`, each taken mod 10, into a
    /// decimal magnitude, keep `rA`'s sign, and leave `rX` untouched.
    fn num(&mut self, next: u16) {
        let a = self.machine.registers.a;
        let x = self.machine.registers.x;
        let a_bytes = a.bytes();
        let x_bytes = x.bytes();
        let magnitude = a_bytes
            .iter()
            .chain(x_bytes.iter())
            .fold(0i64, |acc, &b| acc * 10 + i64::from(b % 10));
        let wrapped = if magnitude > MAX {
            self.machine.overflow = true;
            magnitude % BASE
        } else {
            magnitude
        };
        let signed = a.sign().multiplier() * wrapped;
        self.machine.registers.a = Word::from_int(signed).unwrap_or(Word::ZERO);
        self.machine.program_counter = next;
    }

    /// CHAR: render `|rA|` as exactly ten decimal digits (character codes
    /// 30..=39), splitting them across `rA` (high five) and `rX` (low
    /// five), both taking `rA`'s original sign.
    fn char(&mut self, next: u16) {
        let a = self.machine.registers.a;
        let magnitude = a.to_int().abs();
        let mut digits = [0u8; 10];
        let mut remaining = magnitude;
        for slot in digits.iter_mut().rev() {
            *slot = 30 + (remaining % 10) as u8;
            remaining /= 10;
        }
        let mut high = [0u8; 5];
        let mut low = [0u8; 5];
        high.copy_from_slice(&digits[0..5]);
        low.copy_from_slice(&digits[5..10]);
        self.machine.registers.a = Word::new(a.sign(), high).unwrap_or(Word::ZERO);
        self.machine.registers.x = Word::new(a.sign(), low).unwrap_or(Word::ZERO);
        self.machine.program_counter = next;
    }

    fn shift(&mut self, kind: ShiftKind, m: i64, next: u16) {
        let raw_count = m.unsigned_abs() as usize;
        let registers = &mut self.machine.registers;
        match kind {
            ShiftKind::Sla | ShiftKind::Sra => {
                let count = raw_count % 5;
                let bytes = registers.a.bytes();
                let mut shifted = [0u8; 5];
                if kind == ShiftKind::Sla {
                    for i in 0..5 {
                        if i + count < 5 {
                            shifted[i] = bytes[i + count];
                        }
                    }
                } else {
                    for i in 0..5 {
                        if i >= count {
                            shifted[i] = bytes[i - count];
                        }
                    }
                }
                registers.a = Word::new(registers.a.sign(), shifted).unwrap_or(Word::ZERO);
            }
            ShiftKind::Slax | ShiftKind::Srax => {
                let count = raw_count % 10;
                let combined = Self::ten_bytes(registers.a, registers.x);
                let mut shifted = [0u8; 10];
                if kind == ShiftKind::Slax {
                    for i in 0..10 {
                        if i + count < 10 {
                            shifted[i] = combined[i + count];
                        }
                    }
                } else {
                    for i in 0..10 {
                        if i >= count {
                            shifted[i] = combined[i - count];
                        }
                    }
                }
                let (a_bytes, x_bytes) = Self::split_ten(shifted);
                registers.a = Word::new(registers.a.sign(), a_bytes).unwrap_or(Word::ZERO);
                registers.x = Word::new(registers.x.sign(), x_bytes).unwrap_or(Word::ZERO);
            }
            ShiftKind::Slc | ShiftKind::Src => {
                let count = raw_count % 10;
                let combined = Self::ten_bytes(registers.a, registers.x);
                let mut shifted = [0u8; 10];
                for i in 0..10 {
                    let source = if kind == ShiftKind::Slc {
                        (i + count) % 10
                    } else {
                        (i + 10 - count) % 10
                    };
                    shifted[i] = combined[source];
                }
                let (a_bytes, x_bytes) = Self::split_ten(shifted);
                registers.a = Word::new(registers.a.sign(), a_bytes).unwrap_or(Word::ZERO);
                registers.x = Word::new(registers.x.sign(), x_bytes).unwrap_or(Word::ZERO);
            }
        }
        self.machine.program_counter = next;
    }

    fn ten_bytes(a: Word, x: Word) -> [u8; 10] {
        let mut combined = [0u8; 10];
        combined[0..5].copy_from_slice(&a.bytes());
        combined[5..10].copy_from_slice(&x.bytes());
        combined
    }

    fn split_ten(combined: [u8; 10]) -> ([u8; 5], [u8; 5]) {
        let mut a = [0u8; 5];
        let mut x = [0u8; 5];
        a.copy_from_slice(&combined[0..5]);
        x.copy_from_slice(&combined[5..10]);
        (a, x)
    }

    /// MOVE: copy `count` words from `m..m+count-1` into
    /// `rI1..rI1+count-1`, ascending, then advance `rI1` by `count`.
    fn move_words(&mut self, m: i64, count: u8, next: u16) -> Result<(), ExecError> {
        let mut dest = self.machine.registers.index(1).to_int();
        for k in 0..i64::from(count) {
            let word = self.machine.read(m + k)?;
            self.machine.write(dest + k, word)?;
        }
        dest += i64::from(count);
        self.set_index_or_overflow(1, dest);
        self.machine.program_counter = next;
        Ok(())
    }

    fn load(
        &mut self,
        register: Register,
        field: FieldSpec,
        negate: bool,
        m: i64,
        next: u16,
    ) -> Result<(), ExecError> {
        let mut value = self.machine.read(m)?.slice_spec(field);
        if negate {
            value = value.with_sign(-value.sign());
        }
        match register.index_number() {
            Some(number) => {
                if self.machine.registers.set_index(number, value).is_err() {
                    self.machine.overflow = true;
                }
            }
            None => self.machine.registers.set(register, value),
        }
        self.machine.program_counter = next;
        Ok(())
    }

    fn store(
        &mut self,
        target: StoreTarget,
        field: FieldSpec,
        m: i64,
        next: u16,
    ) -> Result<(), ExecError> {
        let source = match target {
            StoreTarget::Register(register) => self.machine.registers.get(register),
            StoreTarget::J => self.machine.registers.j,
            StoreTarget::Zero => Word::ZERO,
        };
        let mut dest = self.machine.read(m)?;
        dest.store_slice_spec(field, source);
        self.machine.write(m, dest)?;
        self.machine.program_counter = next;
        Ok(())
    }

    fn io(&mut self, stub: IoStub, m: i64, pc: u16, next: u16) {
        match stub {
            IoStub::Jbus => self.branch(false, m, pc, next),
            IoStub::Jred => self.branch(true, m, pc, next),
            IoStub::Ioc | IoStub::In | IoStub::Out => {
                self.machine.program_counter = next;
            }
        }
    }

    fn jump(&mut self, kind: JumpKind, m: i64, pc: u16, next: u16) {
        match kind {
            JumpKind::Jmp => self.branch(true, m, pc, next),
            JumpKind::Jsj => {
                self.machine.program_counter = m as u16;
            }
            JumpKind::Jov => {
                let was_overflow = self.machine.overflow;
                self.machine.overflow = false;
                self.branch(was_overflow, m, pc, next);
            }
            JumpKind::Jnov => {
                let was_overflow = self.machine.overflow;
                self.machine.overflow = false;
                self.branch(!was_overflow, m, pc, next);
            }
            JumpKind::Jl => self.branch(self.machine.comparison == Comparison::Less, m, pc, next),
            JumpKind::Je => self.branch(self.machine.comparison == Comparison::Equal, m, pc, next),
            JumpKind::Jg => {
                self.branch(self.machine.comparison == Comparison::Greater, m, pc, next)
            }
            JumpKind::Jge => self.branch(self.machine.comparison != Comparison::Less, m, pc, next),
            JumpKind::Jne => {
                self.branch(self.machine.comparison != Comparison::Equal, m, pc, next)
            }
            JumpKind::Jle => {
                self.branch(self.machine.comparison != Comparison::Greater, m, pc, next)
            }
        }
    }

    /// Shared tail for every conditional jump: on success, record the
    /// address following this instruction in `rJ` and jump to `m`;
    /// otherwise fall through. `pc` is unused directly (the return
    /// address is always `next`) but kept for symmetry with call sites.
    fn branch(&mut self, take: bool, m: i64, _pc: u16, next: u16) {
        if take {
            self.machine.registers.set_j(next);
            self.machine.program_counter = m as u16;
        } else {
            self.machine.program_counter = next;
        }
    }

    fn address_transfer(
        &mut self,
        register: Register,
        kind: TransferKind,
        m: i64,
        next: u16,
    ) {
        let current = self.machine.registers.get(register).to_int();
        let value = match kind {
            TransferKind::Ent => m,
            TransferKind::Enn => -m,
            TransferKind::Inc => current + m,
            TransferKind::Dec => current - m,
        };

        match register.index_number() {
            Some(number) => self.set_index_or_overflow(number, value),
            None => {
                if value.abs() > MAX {
                    self.machine.overflow = true;
                } else {
                    self.machine.registers.set(register, Word::from_int(value).unwrap());
                }
            }
        }
        self.machine.program_counter = next;
    }

    fn set_index_or_overflow(&mut self, number: u8, value: i64) {
        if value.abs() > INDEX_MAX {
            self.machine.overflow = true;
        } else if let Ok(word) = Word::from_int(value) {
            let _ = self.machine.registers.set_index(number, word);
        }
    }

    fn compare(
        &mut self,
        register: Register,
        field: FieldSpec,
        m: i64,
        next: u16,
    ) -> Result<(), ExecError> {
        let register_value = self.machine.registers.get(register).slice_spec(field).to_int();
        let memory_value = self.machine.read(m)?.slice_spec(field).to_int();
        self.machine.comparison = if register_value < memory_value {
            Comparison::Less
        } else if register_value > memory_value {
            Comparison::Greater
        } else {
            Comparison::Equal
        };
        self.machine.program_counter = next;
        Ok(())
    }
}

impl Default for Cpu {
    fn default() -> Cpu {
        Cpu::new()
    }
}
