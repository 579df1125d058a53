//! The restricted MIXAL expression language: an integer, a symbol, the
//! current-location symbol `*`, or two such terms joined by `+`/`-`
//! (spec.md §4.3, §9 "Assembler expression language").

use crate::parser::Rule;
use crate::symbol_table::SymbolTable;
use pest::iterators::Pair;

#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Int(i64),
    Symbol(String),
    Current,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Term(Term),
    Sum(Term, Term),
    Diff(Term, Term),
}

/// Failure to evaluate an otherwise well-formed expression: the only way
/// this can happen is a reference to a symbol nothing ever defined.
#[derive(Clone, Debug, PartialEq)]
pub struct UndefinedSymbolError {
    pub name: String,
}

impl Term {
    fn resolve(&self, symbols: &SymbolTable, location: i64) -> Result<i64, UndefinedSymbolError> {
        match self {
            Term::Int(n) => Ok(*n),
            Term::Current => Ok(location),
            Term::Symbol(name) => symbols
                .lookup(name)
                .ok_or_else(|| UndefinedSymbolError { name: name.clone() }),
        }
    }
}

impl Expr {
    pub fn evaluate(
        &self,
        symbols: &SymbolTable,
        location: i64,
    ) -> Result<i64, UndefinedSymbolError> {
        match self {
            Expr::Term(t) => t.resolve(symbols, location),
            Expr::Sum(a, b) => Ok(a.resolve(symbols, location)? + b.resolve(symbols, location)?),
            Expr::Diff(a, b) => Ok(a.resolve(symbols, location)? - b.resolve(symbols, location)?),
        }
    }
}

fn parse_term(pair: Pair<Rule>) -> Term {
    match pair.as_rule() {
        Rule::integer => Term::Int(pair.as_str().parse().expect("integer rule matches i64")),
        Rule::current => Term::Current,
        Rule::identifier => Term::Symbol(pair.as_str().to_ascii_uppercase()),
        other => unreachable!("unexpected term rule {:?}", other),
    }
}

/// Build an [`Expr`] from a parsed `Rule::expr` pair.
pub fn parse_expr(pair: Pair<Rule>) -> Expr {
    let mut inner = pair.into_inner();
    let first = parse_term(inner.next().expect("expr always has a first term"));
    match inner.next() {
        None => Expr::Term(first),
        Some(op) => {
            let second = parse_term(inner.next().expect("expr operator is followed by a term"));
            match op.as_str() {
                "+" => Expr::Sum(first, second),
                "-" => Expr::Diff(first, second),
                other => unreachable!("unexpected expr operator {:?}", other),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::{OperandParser, Rule};
    use pest::Parser;

    fn parse(input: &str) -> Expr {
        let pair = OperandParser::parse(Rule::expr, input)
            .unwrap()
            .next()
            .unwrap();
        parse_expr(pair)
    }

    #[test]
    fn bare_integer_evaluates_to_itself() {
        let symbols = SymbolTable::new();
        assert_eq!(parse("42").evaluate(&symbols, 0).unwrap(), 42);
        assert_eq!(parse("-7").evaluate(&symbols, 0).unwrap(), -7);
    }

    #[test]
    fn current_location_substitutes_star() {
        let symbols = SymbolTable::new();
        assert_eq!(parse("*").evaluate(&symbols, 17).unwrap(), 17);
        assert_eq!(parse("*+2").evaluate(&symbols, 17).unwrap(), 19);
    }

    #[test]
    fn symbol_plus_minus_symbol_and_integer() {
        let mut symbols = SymbolTable::new();
        symbols.define("FOO", 10).unwrap();
        symbols.define("BAR", 3).unwrap();
        assert_eq!(parse("FOO+BAR").evaluate(&symbols, 0).unwrap(), 13);
        assert_eq!(parse("FOO-5").evaluate(&symbols, 0).unwrap(), 5);
        assert_eq!(parse("5-FOO").evaluate(&symbols, 0).unwrap(), -5);
    }

    #[test]
    fn undefined_symbol_is_reported() {
        let symbols = SymbolTable::new();
        assert!(parse("MISSING").evaluate(&symbols, 0).is_err());
    }
}
