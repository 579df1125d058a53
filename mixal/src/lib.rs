//! A two-pass assembler for MIXAL, Knuth's MIX assembly language
//! (TAOCP Vol. 1, §1.3.2), built on top of the [`mix`](../mix/index.html)
//! crate's word, field and instruction model.
//!
//! The single entry point is [`assemble`]. It accepts MIXAL source text
//! and returns an [`Assembled`] memory image — a full 4000-word program
//! image plus the starting address published by the program's `END`
//! line — together with a [`SourceMap`] associating every emitted word
//! with the source line it came from.
//!
//! # MIXAL source
//!
//! A line has the shape `[LABEL] OP [ADDRESS][,INDEX][(FIELD)] [COMMENT]`.
//! A line starting with `*` is a whole-line comment. `OP` is either one
//! of the ~150 instruction mnemonics (`LDA`, `STJ`, `JMP`, ...) or one of
//! the five pseudo-operations `ORIG`, `EQU`, `CON`, `ALF`, `END`.
//! `ADDRESS` is an integer, a symbol, a literal `=expr=`, or a two-term
//! sum/difference of those; `*` inside an address denotes the current
//! location counter.
//!
//! Parsing the operand grammar (the address/index/field specification
//! that follows the mnemonic) is implemented with [pest]; the outer,
//! line-oriented concerns — splitting a label from a mnemonic, and
//! recognizing `ALF`'s raw, non-tokenized text operand — are handled in
//! [`lexer`] ahead of the grammar, since they depend on the mnemonic
//! keyword table rather than on pure syntax.
//!
//! This crate's [`Error`] type is `pest::error::Error<Rule>`, matching
//! the teacher's `vasm::Error` type alias, so pretty `line:col`
//! formatting and [`Error::with_path`] come for free from `pest`.
//!
//! [pest]: https://docs.rs/pest/

mod assembler;
mod ast;
mod error;
mod expr;
mod lexer;
mod literal_pool;
mod node_builder;
mod opcodes;
mod parser;
mod pseudo_op;
mod source_map;
mod symbol_table;

pub use assembler::{assemble, Assembled};
pub use error::{Error, Result};
pub use expr::{Expr, Term, UndefinedSymbolError};
pub use parser::Rule;
pub use source_map::{SourceMap, SourceMapItem};
pub use symbol_table::SymbolTable;

#[cfg(test)]
mod test {
    use super::assemble;

    #[test]
    fn array_sum_via_mixal_source() {
        let source = "\
                ORIG 0\n\
                ENT1 0\n\
        LOOP    LDA SUM\n\
                ADD ARRAY,1\n\
                STA SUM\n\
                INC1 1\n\
                CMP1 FIVE\n\
                JL LOOP\n\
                HLT\n\
        SUM     CON 0\n\
        FIVE    CON 5\n\
        ARRAY   CON 10\n\
                CON 20\n\
                CON 30\n\
                CON 40\n\
                CON 50\n";

        let (assembled, source_map) = assemble(source).unwrap();
        // 8 instructions plus 7 CON words, no literals in this program.
        assert_eq!(source_map.len(), 15);

        let mut cpu = mix::Cpu::new();
        for (address, &word) in assembled.memory.iter().enumerate() {
            cpu.machine.write(address as i64, word).unwrap();
        }
        cpu.machine.program_counter = assembled.start;
        cpu.run(10_000).unwrap();

        // SUM lives right after the eight instructions, at location 8.
        assert_eq!(cpu.machine.read(8).unwrap().to_int(), 150);
        assert!(cpu.machine.is_halted());
    }
}
