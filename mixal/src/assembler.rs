//! The two-pass assembly driver (spec.md §4.3): walk the parsed program
//! once to resolve the location counter, the symbol table and the
//! literal pool (pass 1), then once more to emit each word into a
//! memory image (pass 2). Grounded in the teacher's `vasm::assemble`
//! entry point, which also drove a `.data`/`.instructions` walk in two
//! passes over one parsed tree; generalized here from that two-section
//! layout to MIXAL's single interleaved stream of pseudo-ops and
//! instructions, each carrying its own location.

use crate::ast::{AddressOperand, FieldOperand, Node};
use crate::error::{error_at_line, Error};
use crate::expr::Expr;
use crate::lexer::{lex_line, Line};
use crate::literal_pool::LiteralPool;
use crate::node_builder::build_node;
use crate::opcodes;
use crate::source_map::{SourceMap, SourceMapItem};
use crate::symbol_table::SymbolTable;
use mix::{FieldSpec, Instruction, Sign, Word, MEMORY_SIZE};

/// The output of a successful assembly: a full 4000-word memory image
/// plus the starting address published by the program's `END` line
/// (spec.md §4.3, §6), ready to be handed to a [`mix::Cpu`].
pub struct Assembled {
    pub memory: Box<[Word; MEMORY_SIZE]>,
    pub start: u16,
}

/// One pass-1 emission: either a real source line (`CON`/`ALF`/an
/// instruction) or a synthetic literal-pool slot with no source line of
/// its own.
enum Emission<'a> {
    Node(&'a Node),
    Literal(Expr),
}

struct EmissionEntry<'a> {
    location: i64,
    line: u32,
    kind: Emission<'a>,
}

/// Parse and assemble a complete MIXAL program, per spec.md §4.3.
pub fn assemble(source: &str) -> Result<(Assembled, SourceMap), Error> {
    let nodes = parse_program(source)?;
    assemble_nodes(source, &nodes)
}

fn parse_program(source: &str) -> Result<Vec<Node>, Error> {
    let mut nodes = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = idx as u32 + 1;
        match lex_line(line).map_err(|msg| error_at_line(source, line_no, msg))? {
            Line::Blank | Line::Comment => continue,
            Line::Code(code) => nodes.push(build_node(source, line_no, &code)?),
        }
    }
    Ok(nodes)
}

fn assemble_nodes<'a>(source: &str, nodes: &'a [Node]) -> Result<(Assembled, SourceMap), Error> {
    let mut symbols = SymbolTable::new();
    let mut literals = LiteralPool::new();
    let mut emissions: Vec<EmissionEntry<'a>> = Vec::new();
    let mut location: i64 = 0;
    let mut end_value: Option<(Expr, u32)> = None;

    for node in nodes {
        match node {
            Node::Orig { label, value, line } => {
                let new_location = value
                    .evaluate(&symbols, location)
                    .map_err(|e| undefined(source, *line, &e.name))?;
                if let Some(name) = label {
                    define(&mut symbols, name, new_location, source, *line)?;
                }
                location = new_location;
            }
            Node::Equ { label, value, line } => {
                let v = value
                    .evaluate(&symbols, location)
                    .map_err(|e| undefined(source, *line, &e.name))?;
                define(&mut symbols, label, v, source, *line)?;
            }
            Node::Con { label, line, .. } => {
                if let Some(name) = label {
                    define(&mut symbols, name, location, source, *line)?;
                }
                emissions.push(EmissionEntry { location, line: *line, kind: Emission::Node(node) });
                location += 1;
            }
            Node::Alf { label, line, .. } => {
                if let Some(name) = label {
                    define(&mut symbols, name, location, source, *line)?;
                }
                emissions.push(EmissionEntry { location, line: *line, kind: Emission::Node(node) });
                location += 1;
            }
            Node::Instruction { label, address, line, .. } => {
                if let Some(name) = label {
                    define(&mut symbols, name, location, source, *line)?;
                }
                if let Some(AddressOperand::Literal(text, expr)) = address {
                    literals.record(text, expr.clone());
                }
                emissions.push(EmissionEntry { location, line: *line, kind: Emission::Node(node) });
                location += 1;
            }
            Node::End { value, line } => {
                end_value = value.clone().map(|v| (v, *line));
                break;
            }
        }
    }

    let literal_base = location;
    for (offset, expr) in literals.iter().cloned().enumerate() {
        emissions.push(EmissionEntry {
            location: literal_base + offset as i64,
            line: 0,
            kind: Emission::Literal(expr),
        });
    }

    let mut memory = Box::new([Word::ZERO; MEMORY_SIZE]);
    let mut source_map = SourceMap::new();
    for entry in &emissions {
        let word = emit_word(source, entry, &symbols, &literals, literal_base)?;
        write_memory(&mut memory, entry.location, word, source, entry.line)?;
        source_map.push(SourceMapItem { start_line: entry.line, line_count: 1 });
    }

    let start = match end_value {
        Some((expr, line)) => {
            let v = expr
                .evaluate(&symbols, 0)
                .map_err(|e| undefined(source, line, &e.name))?;
            address_magnitude(v, source, line)?
        }
        None => 0,
    };

    Ok((Assembled { memory, start }, source_map))
}

fn define(
    symbols: &mut SymbolTable,
    name: &str,
    value: i64,
    source: &str,
    line: u32,
) -> Result<(), Error> {
    symbols
        .define(name, value)
        .map_err(|name| error_at_line(source, line, format!("duplicate symbol \"{}\"", name)))
}

fn undefined(source: &str, line: u32, name: &str) -> Error {
    error_at_line(source, line, format!("undefined symbol \"{}\"", name))
}

fn write_memory(
    memory: &mut [Word; MEMORY_SIZE],
    location: i64,
    word: Word,
    source: &str,
    line: u32,
) -> Result<(), Error> {
    if location < 0 || location as usize >= MEMORY_SIZE {
        return Err(error_at_line(
            source,
            line,
            format!("location {} is outside memory (0..{})", location, MEMORY_SIZE),
        ));
    }
    memory[location as usize] = word;
    Ok(())
}

/// `|v|`, checked to fit in the instruction's 12-bit address field.
fn address_magnitude(v: i64, source: &str, line: u32) -> Result<u16, Error> {
    let magnitude = v.abs();
    if magnitude > 4095 {
        return Err(error_at_line(
            source,
            line,
            format!("address {} does not fit in 12 bits", v),
        ));
    }
    Ok(magnitude as u16)
}

fn emit_word(
    source: &str,
    entry: &EmissionEntry,
    symbols: &SymbolTable,
    literals: &LiteralPool,
    literal_base: i64,
) -> Result<Word, Error> {
    match &entry.kind {
        Emission::Literal(expr) => emit_con(source, entry.line, entry.location, expr, symbols),
        Emission::Node(Node::Con { value, .. }) => {
            emit_con(source, entry.line, entry.location, value, symbols)
        }
        Emission::Node(Node::Alf { text, .. }) => Ok(Word::from_alf(text)
            .expect("ALF operand is truncated to five characters in node_builder")),
        Emission::Node(Node::Instruction { mnemonic, address, index, field, .. }) => {
            emit_instruction(
                source,
                entry.line,
                entry.location,
                mnemonic,
                address,
                *index,
                field,
                symbols,
                literals,
                literal_base,
            )
        }
        Emission::Node(Node::Orig { .. }) | Emission::Node(Node::Equ { .. })
        | Emission::Node(Node::End { .. }) => {
            unreachable!("ORIG/EQU/END never produce an emission entry")
        }
    }
}

fn emit_con(
    source: &str,
    line: u32,
    location: i64,
    value: &Expr,
    symbols: &SymbolTable,
) -> Result<Word, Error> {
    let v = value
        .evaluate(symbols, location)
        .map_err(|e| undefined(source, line, &e.name))?;
    Word::from_int(v).map_err(|_| error_at_line(source, line, format!("value {} does not fit in a word", v)))
}

#[allow(clippy::too_many_arguments)]
fn emit_instruction(
    source: &str,
    line: u32,
    location: i64,
    mnemonic: &str,
    address: &Option<AddressOperand>,
    index: Option<u8>,
    field: &Option<FieldOperand>,
    symbols: &SymbolTable,
    literals: &LiteralPool,
    literal_base: i64,
) -> Result<Word, Error> {
    let (opcode, default_field) = opcodes::lookup(mnemonic)
        .ok_or_else(|| error_at_line(source, line, format!("unknown mnemonic \"{}\"", mnemonic)))?;

    let (sign, aa) = match address {
        None => (Sign::Plus, 0u16),
        Some(AddressOperand::Literal(text, _)) => {
            let slot = literals
                .slot_of(text)
                .expect("every literal operand was recorded into the pool during pass 1");
            let slot_address = literal_base + slot as i64;
            (Sign::Plus, address_magnitude(slot_address, source, line)?)
        }
        Some(AddressOperand::Expr(expr)) => {
            let v = expr
                .evaluate(symbols, location)
                .map_err(|e| undefined(source, line, &e.name))?;
            let sign = if v < 0 { Sign::Minus } else { Sign::Plus };
            (sign, address_magnitude(v, source, line)?)
        }
    };

    let field_byte = match field {
        None => default_field,
        Some(FieldOperand::Single(n)) => {
            if *n < 0 || *n > 63 {
                return Err(error_at_line(source, line, format!("field {} is out of range", n)));
            }
            *n as u8
        }
        Some(FieldOperand::Range(l, r)) => {
            if *l < 0 || *r > 5 {
                return Err(error_at_line(source, line, format!("invalid field ({}:{})", l, r)));
            }
            FieldSpec::new(*l as u8, *r as u8)
                .map_err(|_| error_at_line(source, line, format!("invalid field ({}:{})", l, r)))?
                .encode()
        }
    };

    let instr = Instruction::new(sign, aa, index.unwrap_or(0), field_byte, opcode);
    instr
        .to_word()
        .map_err(|_| error_at_line(source, line, format!("address {} does not fit in 12 bits", aa)))
}
