//! A faithful emulator of Knuth's MIX pedagogical computer (TAOCP Vol. 1,
//! §1.3): the sign-magnitude, base-64, five-byte [`Word`], the
//! `(opcode, field)` instruction codec, and the [`Cpu`] that fetches,
//! decodes and executes MIX programs against a 4000-word [`Machine`].
//!
//! This crate is the core simulator only. Assembling MIXAL source into a
//! memory image is the `mixal` crate's job; persisting images to disk is
//! `mixword-image`'s; the `mix` binary (`mix-cli` crate) wires both of
//! those to this crate's [`Cpu`] behind three subcommands.

mod charset;
mod cpu;
mod error;
mod field;
mod instruction;
mod machine;
mod operation;
mod registers;
mod sign;
mod word;

pub use charset::{decode_char, encode_char};
pub use cpu::Cpu;
pub use error::{AddressError, ExecError, WordError};
pub use field::FieldSpec;
pub use instruction::Instruction;
pub use machine::{Comparison, Machine, RunState, MEMORY_SIZE};
pub use operation::{
    decode, IoStub, JumpKind, Operation, Register, ShiftKind, SignTest, StoreTarget, TransferKind,
};
pub use registers::{Registers, INDEX_MAX};
pub use sign::Sign;
pub use word::{Word, MAX};
