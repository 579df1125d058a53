//! Turns one [`CodeLine`] into an [`ast::Node`]: decides pseudo-op vs.
//! instruction via the same keyword table `lexer::lex_line` already
//! consulted, then hands the operand text to the `pest` grammar.
//!
//! The operand is taken to be the single whitespace-delimited token
//! right after the mnemonic — real MIXAL address/index/field specs never
//! contain internal whitespace (`200,1(1:5)` is one run of characters),
//! so the first run *is* the whole operand and whatever follows a
//! further gap is a comment. An operand is only consumed at all when
//! `CodeLine::has_operand_column` says the mnemonic is followed by
//! exactly one space; a wider gap means the line carries no address at
//! all, and the first word sitting out in the remark column (`HLT
//! DONE`) must not be parsed as one. `ALF` is the one exception: its
//! operand is a raw 5-character slice that may itself contain spaces, so
//! it never goes through this token split or the `pest` grammar at all.

use crate::ast::{AddressOperand, FieldOperand, Node};
use crate::error::{error_at_line, from_operand_parse, Error};
use crate::expr::{parse_expr, Expr};
use crate::lexer::CodeLine;
use crate::opcodes;
use crate::parser::{OperandParser, Rule};
use crate::pseudo_op::PseudoOp;
use pest::iterators::Pair;
use pest::Parser;
use std::str::FromStr;

pub fn build_node(source: &str, line_no: u32, code: &CodeLine) -> Result<Node, Error> {
    let op = code.op.to_ascii_uppercase();
    let label = code.label.map(|l| l.to_ascii_uppercase());

    if op == "ALF" {
        let text: String = code.rest.chars().take(5).collect();
        return Ok(Node::Alf { label, text, line: line_no });
    }

    if let Ok(pseudo) = PseudoOp::from_str(&op) {
        let operand = first_token(code);
        return build_pseudo_node(source, line_no, pseudo, label, operand);
    }

    if !opcodes::is_mnemonic(&op) {
        return Err(error_at_line(source, line_no, format!("unknown mnemonic \"{}\"", op)));
    }

    let operand = first_token(code);
    let (address, index, field) = parse_operand(source, line_no, operand)?;
    Ok(Node::Instruction {
        label,
        mnemonic: op,
        address,
        index,
        field,
        line: line_no,
    })
}

fn build_pseudo_node(
    source: &str,
    line_no: u32,
    pseudo: PseudoOp,
    label: Option<String>,
    operand: &str,
) -> Result<Node, Error> {
    match pseudo {
        PseudoOp::ORIG => {
            let value = require_value(source, line_no, operand, "ORIG")?;
            Ok(Node::Orig { label, value, line: line_no })
        }
        PseudoOp::EQU => {
            let label = label.ok_or_else(|| error_at_line(source, line_no, "EQU requires a label".to_string()))?;
            let value = require_value(source, line_no, operand, "EQU")?;
            Ok(Node::Equ { label, value, line: line_no })
        }
        PseudoOp::CON => {
            let value = require_value(source, line_no, operand, "CON")?;
            Ok(Node::Con { label, value, line: line_no })
        }
        PseudoOp::END => {
            let value = if operand.is_empty() {
                None
            } else {
                Some(parse_value(source, line_no, operand)?)
            };
            Ok(Node::End { value, line: line_no })
        }
        PseudoOp::ALF => unreachable!("ALF is handled before pseudo-op dispatch"),
    }
}

fn require_value(source: &str, line_no: u32, operand: &str, op_name: &str) -> Result<Expr, Error> {
    if operand.is_empty() {
        return Err(error_at_line(source, line_no, format!("{} requires a value", op_name)));
    }
    parse_value(source, line_no, operand)
}

fn first_token<'a>(code: &CodeLine<'a>) -> &'a str {
    if !code.has_operand_column {
        return "";
    }
    code.rest.split_whitespace().next().unwrap_or("")
}

fn find_rule(pair: Pair<Rule>, rule: Rule) -> Pair<Rule> {
    pair.into_inner()
        .find(|p| p.as_rule() == rule)
        .unwrap_or_else(|| panic!("expected a {:?} pair", rule))
}

fn parse_value(source: &str, line_no: u32, token: &str) -> Result<Expr, Error> {
    let top = OperandParser::parse(Rule::value_line, token)
        .map_err(|e| from_operand_parse(e, source, line_no))?
        .next()
        .expect("value_line always produces one pair");
    Ok(parse_expr(find_rule(top, Rule::expr)))
}

type ParsedOperand = (Option<AddressOperand>, Option<u8>, Option<FieldOperand>);

fn parse_operand(source: &str, line_no: u32, token: &str) -> Result<ParsedOperand, Error> {
    let top = OperandParser::parse(Rule::operand_line, token)
        .map_err(|e| from_operand_parse(e, source, line_no))?
        .next()
        .expect("operand_line always produces one pair");
    let operand = find_rule(top, Rule::operand);

    let mut address = None;
    let mut index = None;
    let mut field = None;

    for part in operand.into_inner() {
        match part.as_rule() {
            Rule::literal => {
                let expr_pair = part.into_inner().next().expect("literal wraps one expr");
                let text = expr_pair.as_str().to_string();
                address = Some(AddressOperand::Literal(text, parse_expr(expr_pair)));
            }
            Rule::expr => {
                address = Some(AddressOperand::Expr(parse_expr(part)));
            }
            Rule::index_part => {
                let n = parse_int(find_rule(part, Rule::integer));
                if !(0..=6).contains(&n) {
                    return Err(error_at_line(source, line_no, format!("index must be 0..=6, got {}", n)));
                }
                index = Some(n as u8);
            }
            Rule::field_part => {
                let spec = find_rule(part, Rule::field_spec);
                let mut ints = spec.into_inner();
                let l = parse_int(ints.next().expect("field_spec has at least one integer"));
                field = Some(match ints.next() {
                    None => FieldOperand::Single(l),
                    Some(r) => FieldOperand::Range(l, parse_int(r)),
                });
            }
            other => unreachable!("unexpected operand part {:?}", other),
        }
    }

    Ok((address, index, field))
}

fn parse_int(pair: Pair<Rule>) -> i64 {
    pair.as_str().parse().expect("integer rule matches i64")
}
