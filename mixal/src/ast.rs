//! The parser's output nodes (spec.md §4.3): one instruction node or
//! pseudo-op node per non-blank, non-comment source line.

use crate::expr::Expr;

#[derive(Clone, Debug)]
pub enum AddressOperand {
    Expr(Expr),
    /// A literal `=E=`: the raw source text between the `=` signs (the
    /// literal pool's dedup key) and its parsed expression.
    Literal(String, Expr),
}

#[derive(Clone, Debug)]
pub enum FieldOperand {
    /// A single explicit field number, used verbatim as `F`.
    Single(i64),
    /// An explicit `L:R` pair, encoded as `F = 8*L + R`.
    Range(i64, i64),
}

#[derive(Clone, Debug)]
pub enum Node {
    Orig {
        label: Option<String>,
        value: Expr,
        line: u32,
    },
    Equ {
        label: String,
        value: Expr,
        line: u32,
    },
    Con {
        label: Option<String>,
        value: Expr,
        line: u32,
    },
    Alf {
        label: Option<String>,
        text: String,
        line: u32,
    },
    End {
        value: Option<Expr>,
        line: u32,
    },
    Instruction {
        label: Option<String>,
        mnemonic: String,
        address: Option<AddressOperand>,
        index: Option<u8>,
        field: Option<FieldOperand>,
        line: u32,
    },
}
