//! Every assembly-time failure — lexing, parsing, undefined/duplicate
//! symbols, malformed expressions, bad literals — surfaces through one
//! type, exactly as the teacher's `vasm::Error` is just
//! `pest::error::Error<Rule>`: spec.md §7 calls these categories
//! "semantic, not type names", so one `pest`-backed error with a
//! descriptive message plays all of their roles, and pretty `line:col`
//! formatting comes for free.

use crate::parser::Rule;
use pest::error::{Error as PestError, ErrorVariant};
use pest::Position;

pub type Error = PestError<Rule>;

pub type Result<T> = std::result::Result<T, Error>;

/// Build an `Error` anchored at the start of 1-based `line` within
/// `source`. The teacher's `new_parser_error` anchors errors at a
/// `pest::Span` it already has in hand from parsing the whole program
/// with `pest`; our outer lexer walks `source` line by line by hand
/// (see `lexer.rs`), so this locates the line's byte offset itself
/// instead.
pub fn error_at_line(source: &str, line: u32, message: String) -> Error {
    let offset = line_offset(source, line);
    let position = Position::new(source, offset).unwrap_or_else(|| Position::from_start(source));
    Error::new_from_pos(ErrorVariant::CustomError { message }, position)
}

/// Wrap a `pest` parse failure from parsing one line's operand in
/// isolation, re-anchoring it at that line's offset in the whole
/// source so the reported `line:col` matches the program, not line 1
/// of the operand substring.
pub fn from_operand_parse(err: PestError<Rule>, source: &str, line: u32) -> Error {
    error_at_line(source, line, format!("{}", err))
}

fn line_offset(source: &str, line: u32) -> usize {
    if line <= 1 {
        return 0;
    }
    source
        .match_indices('\n')
        .nth(line as usize - 2)
        .map(|(idx, _)| idx + 1)
        .unwrap_or(source.len())
}

#[cfg(test)]
mod test {
    use super::error_at_line;

    #[test]
    fn error_reports_the_requested_line_and_column() {
        let source = "ORIG 0\nLDA BAD\nHLT\n";
        let err = error_at_line(source, 2, "undefined symbol \"BAD\"".to_string());
        let message = format!("{}", err);
        assert!(message.contains("undefined symbol"));
        assert!(message.contains("2:1"));
    }
}
