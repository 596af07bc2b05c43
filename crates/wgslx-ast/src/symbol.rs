//! Interned identifier names.
//!
//! A [`Symbol`] is a lightweight (u32) identity for a name spelled in a
//! program. The [`SymbolTable`] deduplicates names, so two occurrences of
//! the same spelling always share one symbol.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

/// A typed handle into a [`SymbolTable`].
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Symbol(u32);

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl Symbol {
    /// Returns the zero-based index of this symbol.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A deduplicating name table that returns the same [`Symbol`] for equal names.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    map: HashMap<String, u32>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct names in the table.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the table holds no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Interns a name, returning the existing symbol if it is already present.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&index) = self.map.get(name) {
            return Symbol(index);
        }
        let index = u32::try_from(self.names.len()).unwrap_or_else(|_| {
            panic!("symbol table overflow: {} names exceeds u32::MAX", self.names.len())
        });
        self.map.insert(name.to_owned(), index);
        self.names.push(name.to_owned());
        Symbol(index)
    }

    /// Looks up a name without interning it.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).map(|&index| Symbol(index))
    }

    /// Returns the spelling of a symbol, if it belongs to this table.
    pub fn try_name(&self, symbol: Symbol) -> Option<&str> {
        self.names.get(symbol.index()).map(String::as_str)
    }

    /// Iterates over `(symbol, name)` pairs in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        // Table size bounded by u32::MAX (enforced in intern)
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (Symbol(i as u32), name.as_str()))
    }
}

impl Index<Symbol> for SymbolTable {
    type Output = str;

    fn index(&self, symbol: Symbol) -> &str {
        &self.names[symbol.index()]
    }
}
