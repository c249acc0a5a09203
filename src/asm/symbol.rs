use crate::parse::is_keyword;
use std::collections::HashMap;
use thiserror::Error;

//===========================================================================//

/// The maximum length of a symbol name, in bytes.
pub const MAX_SYMBOL_NAME_LEN: usize = 15;

//===========================================================================//

/// A named constant supplied to the assembler.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Symbol {
    /// The name by which source code refers to the symbol.
    pub name: String,
    /// The symbol's value.
    pub value: i32,
}

impl Symbol {
    /// Constructs a symbol.
    pub fn new(name: impl Into<String>, value: i32) -> Symbol {
        Symbol { name: name.into(), value }
    }
}

//===========================================================================//

/// An error encountered while building a [`SymbolTable`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SymbolError {
    /// The name is not a valid identifier.
    #[error("symbol name `{0}` is not a valid identifier")]
    InvalidName(String),
    /// The name is longer than [`MAX_SYMBOL_NAME_LEN`].
    #[error(
        "symbol name `{0}` is longer than {max} characters",
        max = MAX_SYMBOL_NAME_LEN
    )]
    NameTooLong(String),
    /// The name is an assembler keyword, so source code could never refer
    /// to the symbol.
    #[error("symbol name `{0}` is a reserved keyword")]
    Reserved(String),
    /// The same name was given more than once.
    #[error("symbol `{0}` is defined more than once")]
    Duplicate(String),
}

//===========================================================================//

/// An immutable set of named constants that operands may refer to.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SymbolTable {
    values: HashMap<String, i32>,
}

impl SymbolTable {
    /// Builds a symbol table, validating every name.
    pub fn new(symbols: &[Symbol]) -> Result<SymbolTable, SymbolError> {
        let mut values = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            let name = symbol.name.as_str();
            if !is_identifier(name) {
                return Err(SymbolError::InvalidName(name.to_string()));
            }
            if name.len() > MAX_SYMBOL_NAME_LEN {
                return Err(SymbolError::NameTooLong(name.to_string()));
            }
            if is_keyword(name) {
                return Err(SymbolError::Reserved(name.to_string()));
            }
            if values.insert(name.to_string(), symbol.value).is_some() {
                return Err(SymbolError::Duplicate(name.to_string()));
            }
        }
        Ok(SymbolTable { values })
    }

    /// Returns the value of the named symbol, if it exists.
    pub fn get(&self, name: &str) -> Option<i32> {
        self.values.get(name).copied()
    }

    /// Returns the number of symbols in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the table holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|chr| chr.is_ascii_alphanumeric() || chr == '_')
        }
        _ => false,
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Symbol, SymbolError, SymbolTable};

    #[test]
    fn lookup() {
        let table = SymbolTable::new(&[
            Symbol::new("dst", 0xc000),
            Symbol::new("len", 5),
            Symbol::new("neg_one", -1),
        ])
        .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("dst"), Some(0xc000));
        assert_eq!(table.get("neg_one"), Some(-1));
        assert_eq!(table.get("src"), None);
        assert!(SymbolTable::default().is_empty());
    }

    #[test]
    fn invalid_names() {
        assert_eq!(
            SymbolTable::new(&[Symbol::new("", 0)]),
            Err(SymbolError::InvalidName(String::new()))
        );
        assert_eq!(
            SymbolTable::new(&[Symbol::new("2x", 0)]),
            Err(SymbolError::InvalidName("2x".to_string()))
        );
        assert_eq!(
            SymbolTable::new(&[Symbol::new("a_very_long_name", 0)]),
            Err(SymbolError::NameTooLong("a_very_long_name".to_string()))
        );
        let symbols = [Symbol::new("fifteen_chars__", 0)];
        assert!(SymbolTable::new(&symbols).is_ok());
    }

    #[test]
    fn reserved_and_duplicate_names() {
        assert_eq!(
            SymbolTable::new(&[Symbol::new("hl", 0)]),
            Err(SymbolError::Reserved("hl".to_string()))
        );
        assert_eq!(
            SymbolTable::new(&[Symbol::new("x", 1), Symbol::new("x", 2)]),
            Err(SymbolError::Duplicate("x".to_string()))
        );
    }
}

//===========================================================================//
