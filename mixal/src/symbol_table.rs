//! The assembler's symbol table (spec.md §4.3): `define`/`lookup`,
//! defined once per name so forward references can resolve once pass 1
//! finishes walking the whole program. Plays the role the teacher's
//! `labels::LabelMap` played for `vasm`, but as an owned table rather
//! than a borrowed `HashMap<&str, u32>`, since MIXAL symbols (unlike
//! the teacher's labels) can be forward-referenced from an expression
//! evaluated at a *different* location than the one they're defined at.

use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    values: HashMap<String, i64>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            values: HashMap::new(),
        }
    }

    /// Define `name` to be `value`. Fails (returning `name` back) if the
    /// symbol already has a definition.
    pub fn define(&mut self, name: &str, value: i64) -> Result<(), String> {
        if self.values.contains_key(name) {
            return Err(name.to_string());
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }
}

#[cfg(test)]
mod test {
    use super::SymbolTable;

    #[test]
    fn define_then_lookup_round_trips() {
        let mut symbols = SymbolTable::new();
        symbols.define("LOOP", 7).unwrap();
        assert_eq!(symbols.lookup("LOOP"), Some(7));
    }

    #[test]
    fn duplicate_definition_is_rejected() {
        let mut symbols = SymbolTable::new();
        symbols.define("LOOP", 7).unwrap();
        assert!(symbols.define("LOOP", 8).is_err());
    }

    #[test]
    fn undefined_symbol_looks_up_to_none() {
        let symbols = SymbolTable::new();
        assert_eq!(symbols.lookup("MISSING"), None);
    }
}
