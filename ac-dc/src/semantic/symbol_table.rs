use std::collections::BTreeMap;
use std::fmt;

use crate::error::SymbolError;
use crate::ir::types::DataType;

/// Declared variables and their types.
///
/// Ordered by name so every rendering of the table is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<char, DataType>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: char) -> Result<DataType, SymbolError> {
        self.symbols
            .get(&name)
            .copied()
            .ok_or(SymbolError::Undeclared(name))
    }

    /// Adds `name`; each name may be entered once.
    pub fn enter(&mut self, name: char, datatype: DataType) -> Result<(), SymbolError> {
        if self.symbols.contains_key(&name) {
            return Err(SymbolError::Duplicate(name));
        }
        self.symbols.insert(name, datatype);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, DataType)> + '_ {
        self.symbols.iter().map(|(name, datatype)| (*name, *datatype))
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Symbol Table: {} entries>", self.len())?;
        for (name, datatype) in self.iter() {
            writeln!(f, "  {} {}", name, datatype)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_then_lookup() {
        let mut table = SymbolTable::new();
        table.enter('a', DataType::Int).unwrap();
        table.enter('b', DataType::Float).unwrap();
        assert_eq!(table.lookup('a'), Ok(DataType::Int));
        assert_eq!(table.lookup('b'), Ok(DataType::Float));
        assert_eq!(table.lookup('c'), Err(SymbolError::Undeclared('c')));
    }

    #[test]
    fn names_are_entered_once() {
        let mut table = SymbolTable::new();
        table.enter('a', DataType::Int).unwrap();
        assert_eq!(table.enter('a', DataType::Float), Err(SymbolError::Duplicate('a')));
        assert_eq!(table.lookup('a'), Ok(DataType::Int));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn renders_in_name_order() {
        let mut table = SymbolTable::new();
        table.enter('z', DataType::Float).unwrap();
        table.enter('a', DataType::Int).unwrap();
        assert_eq!(table.to_string(), "<Symbol Table: 2 entries>\n  a INT\n  z FLOAT\n");
    }
}
