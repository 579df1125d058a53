//! Hand-assembled integration scenarios from spec.md §8, built directly out
//! of [`Instruction`]s rather than through the `mixal` assembler (which
//! depends on this crate, not the other way around). The MIXAL-source
//! versions of the same scenarios live in `mixal/tests`.

use mix::{Cpu, Instruction, Sign, Word};

fn poke(cpu: &mut Cpu, address: i64, sign: Sign, aa: u16, index: u8, field: u8, opcode: u8) {
    let instr = Instruction::new(sign, aa, index, field, opcode);
    cpu.machine.write(address, instr.to_word().unwrap()).unwrap();
}

/// 10! computed by keeping the running product in `rA`, multiplying by a
/// down-counting `rI1` each iteration and moving the (always single-word)
/// low half of the product back into `rA`.
#[test]
fn factorial_ten() {
    let mut cpu = Cpu::new();
    cpu.machine.write(202, Word::from_int(0).unwrap()).unwrap(); // ZERO

    poke(&mut cpu, 0, Sign::Plus, 1, 0, 0, 48); // ENTA 1
    poke(&mut cpu, 1, Sign::Plus, 10, 0, 0, 49); // ENT1 10
    poke(&mut cpu, 2, Sign::Plus, 200, 0, 5, 25); // loop: ST1 200
    poke(&mut cpu, 3, Sign::Plus, 200, 0, 5, 3); // MUL 200
    poke(&mut cpu, 4, Sign::Plus, 201, 0, 5, 31); // STX 201
    poke(&mut cpu, 5, Sign::Plus, 201, 0, 5, 8); // LDA 201
    poke(&mut cpu, 6, Sign::Plus, 1, 0, 3, 49); // DEC1 1
    poke(&mut cpu, 7, Sign::Plus, 202, 0, 5, 57); // CMP1 202
    poke(&mut cpu, 8, Sign::Plus, 2, 0, 6, 39); // JG loop
    poke(&mut cpu, 9, Sign::Plus, 0, 0, 2, 5); // HLT

    cpu.run(10_000).unwrap();

    assert_eq!(cpu.machine.registers.a.to_int(), 3_628_800);
    assert!(!cpu.machine.overflow);
    assert!(cpu.machine.is_halted());
}

/// Sum the array {10, 20, 30, 40, 50} at addresses 200..=204 using an
/// index-register-driven loop, storing the running total at address 199.
#[test]
fn array_sum() {
    let mut cpu = Cpu::new();
    let values = [10i64, 20, 30, 40, 50];
    for (offset, &value) in values.iter().enumerate() {
        cpu.machine
            .write(200 + offset as i64, Word::from_int(value).unwrap())
            .unwrap();
    }
    cpu.machine.write(199, Word::ZERO).unwrap(); // SUM
    cpu.machine.write(250, Word::from_int(5).unwrap()).unwrap(); // FIVE

    poke(&mut cpu, 0, Sign::Plus, 0, 0, 0, 49); // ENT1 0
    poke(&mut cpu, 1, Sign::Plus, 199, 0, 5, 8); // loop: LDA SUM
    poke(&mut cpu, 2, Sign::Plus, 200, 1, 5, 1); // ADD 200,1
    poke(&mut cpu, 3, Sign::Plus, 199, 0, 5, 24); // STA SUM
    poke(&mut cpu, 4, Sign::Plus, 1, 0, 2, 49); // INC1 1
    poke(&mut cpu, 5, Sign::Plus, 250, 0, 5, 57); // CMP1 FIVE
    poke(&mut cpu, 6, Sign::Plus, 1, 0, 4, 39); // JL loop
    poke(&mut cpu, 7, Sign::Plus, 0, 0, 2, 5); // HLT

    cpu.run(10_000).unwrap();

    assert_eq!(cpu.machine.read(199).unwrap().to_int(), 150);
    assert!(cpu.machine.is_halted());
}

/// 17 * 23 by repeated addition, counting down a down-counting `rI1`,
/// per spec.md §8 scenario 4.
#[test]
fn repeated_addition_multiplication() {
    let mut cpu = Cpu::new();
    cpu.machine.write(202, Word::from_int(0).unwrap()).unwrap(); // ZERO
    cpu.machine.write(203, Word::from_int(23).unwrap()).unwrap(); // ADDEND

    poke(&mut cpu, 0, Sign::Plus, 0, 0, 5, 48); // ENTA 0
    poke(&mut cpu, 1, Sign::Plus, 17, 0, 0, 49); // ENT1 17
    poke(&mut cpu, 2, Sign::Plus, 203, 0, 5, 1); // loop: ADD ADDEND
    poke(&mut cpu, 3, Sign::Plus, 1, 0, 3, 49); // DEC1 1
    poke(&mut cpu, 4, Sign::Plus, 202, 0, 5, 57); // CMP1 ZERO
    poke(&mut cpu, 5, Sign::Plus, 2, 0, 6, 39); // JG loop
    poke(&mut cpu, 6, Sign::Plus, 0, 0, 2, 5); // HLT

    cpu.run(10_000).unwrap();

    assert_eq!(cpu.machine.registers.a.to_int(), 391);
    assert_eq!(cpu.machine.registers.index(1).to_int(), 0);
    assert!(cpu.machine.is_halted());
}

/// A full SLC(2) then SRC(2) round trip leaves rA/rX unchanged, per
/// spec.md §8's circular-shift law.
#[test]
fn circular_shift_round_trips() {
    let mut cpu = Cpu::new();
    cpu.machine.registers.a = Word::new(Sign::Plus, [1, 2, 3, 4, 5]).unwrap();
    cpu.machine.registers.x = Word::new(Sign::Plus, [6, 7, 8, 9, 10]).unwrap();

    poke(&mut cpu, 0, Sign::Plus, 2, 0, 4, 6); // SLC 2
    poke(&mut cpu, 1, Sign::Plus, 2, 0, 5, 6); // SRC 2
    poke(&mut cpu, 2, Sign::Plus, 0, 0, 2, 5); // HLT

    let a_before = cpu.machine.registers.a;
    let x_before = cpu.machine.registers.x;

    cpu.run(10).unwrap();

    assert_eq!(cpu.machine.registers.a, a_before);
    assert_eq!(cpu.machine.registers.x, x_before);
}
