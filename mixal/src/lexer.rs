//! The outer, line-oriented pass of spec.md §4.3's lexer: splitting each
//! line into an optional label and a mnemonic, consulting the keyword
//! table to tell the two apart, exactly as spec.md describes it ("A
//! keyword table identifies whether the first identifier on a line is
//! an operation... or a label"). This is inherently a semantic lookup,
//! not a syntactic one, so it happens in hand-written Rust rather than
//! in the `pest` grammar — the grammar (`grammar.pest`) is reserved for
//! the operand/expression language that follows the mnemonic.

use crate::opcodes;
use crate::pseudo_op::PseudoOp;
use std::str::FromStr;

/// One non-blank, non-comment source line, split into its label (if
/// any), its mnemonic, and everything after it verbatim — not
/// whitespace-tokenized, since an `ALF` operand is a raw character
/// sequence that may itself contain spaces.
pub struct CodeLine<'a> {
    pub label: Option<&'a str>,
    pub op: &'a str,
    pub rest: &'a str,
    /// Whether exactly one space or tab separates `op` from `rest`.
    /// Real MIXAL source lays out `LABEL  OP ADDRESS  remark`: one
    /// space between the mnemonic and a genuine address/field spec,
    /// then a wider gap before any trailing remark. A gap wider than
    /// one character means there is no operand at all, even if `rest`
    /// is non-empty — it's a comment sitting in the remark column.
    pub has_operand_column: bool,
}

pub enum Line<'a> {
    Blank,
    Comment,
    Code(CodeLine<'a>),
}

/// Classify and split one line. Fails with a plain message (the caller
/// has the source text and line number needed to turn this into a
/// [`crate::error::Error`]) when a label is present but nothing follows
/// it.
pub fn lex_line(line: &str) -> Result<Line, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Line::Blank);
    }
    if trimmed.starts_with('*') {
        return Ok(Line::Comment);
    }

    let (first, after_first) = take_token(line).ok_or_else(|| "expected an operation".to_string())?;

    if is_keyword(first) {
        let (gap, rest) = split_gap(after_first);
        return Ok(Line::Code(CodeLine {
            label: None,
            op: first,
            rest,
            has_operand_column: gap == 1,
        }));
    }

    let (second, after_second) = take_token(after_first)
        .ok_or_else(|| format!("expected an operation after label \"{}\"", first.to_ascii_uppercase()))?;

    let (gap, rest) = split_gap(after_second);
    Ok(Line::Code(CodeLine {
        label: Some(first),
        op: second,
        rest,
        has_operand_column: gap == 1,
    }))
}

/// Split off the leading run of spaces/tabs, returning its length
/// together with what follows.
fn split_gap(s: &str) -> (usize, &str) {
    let rest = s.trim_start_matches(|c| c == ' ' || c == '\t');
    (s.len() - rest.len(), rest)
}

fn is_keyword(token: &str) -> bool {
    let upper = token.to_ascii_uppercase();
    PseudoOp::from_str(&upper).is_ok() || opcodes::is_mnemonic(&upper)
}

/// Split off the first run of non-whitespace characters, returning it
/// together with everything after it (including the whitespace that
/// separated them).
fn take_token(s: &str) -> Option<(&str, &str)> {
    let start = s.find(|c: char| !c.is_whitespace())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| c == ' ' || c == '\t')
        .unwrap_or(rest.len());
    Some((&rest[..end], &rest[end..]))
}

#[cfg(test)]
mod test {
    use super::*;

    fn code(line: &str) -> CodeLine {
        match lex_line(line).unwrap() {
            Line::Code(code) => code,
            _ => panic!("expected a code line"),
        }
    }

    #[test]
    fn whole_line_comment_is_recognized() {
        assert!(matches!(lex_line("* a comment").unwrap(), Line::Comment));
    }

    #[test]
    fn blank_line_is_recognized() {
        assert!(matches!(lex_line("   ").unwrap(), Line::Blank));
    }

    #[test]
    fn line_with_label_splits_label_and_op() {
        let c = code("LOOP     LDA 200,1");
        assert_eq!(c.label, Some("LOOP"));
        assert_eq!(c.op, "LDA");
        assert_eq!(c.rest.trim(), "200,1");
    }

    #[test]
    fn line_without_label_has_no_label() {
        let c = code("     LDA 200,1");
        assert_eq!(c.label, None);
        assert_eq!(c.op, "LDA");
    }

    #[test]
    fn alf_operand_keeps_internal_spaces_raw() {
        let c = code("TEXT     ALF AB CD");
        assert_eq!(c.op, "ALF");
        assert_eq!(c.rest, "AB CD");
    }

    #[test]
    fn label_with_no_following_op_is_an_error() {
        assert!(lex_line("LONELYLABEL").is_err());
    }

    #[test]
    fn single_space_before_operand_is_an_operand_column() {
        let c = code("LOOP     LDA 200,1");
        assert!(c.has_operand_column);
    }

    #[test]
    fn wide_gap_before_trailing_word_is_not_an_operand_column() {
        let c = code("HLT  DONE");
        assert_eq!(c.op, "HLT");
        assert!(!c.has_operand_column);
    }

    #[test]
    fn no_trailing_text_is_not_an_operand_column() {
        let c = code("HLT");
        assert_eq!(c.rest, "");
        assert!(!c.has_operand_column);
    }
}
