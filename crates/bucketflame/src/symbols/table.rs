//! Address → symbol lookup table.

use std::collections::BTreeMap;

/// A symbol known to cover `[start, start + size)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,

    /// Extent in bytes; `None` when the source does not record it
    pub size: Option<u64>,
}

/// Symbols of one library, keyed by library-relative start address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<u64, SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol. A second insert at the same start keeps the first
    /// name and widens the extent.
    pub fn insert(&mut self, start: u64, name: impl Into<String>, size: Option<u64>) {
        match self.symbols.get_mut(&start) {
            Some(existing) => {
                existing.size = match (existing.size, size) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                };
            }
            None => {
                self.symbols.insert(
                    start,
                    SymbolEntry {
                        name: name.into(),
                        size,
                    },
                );
            }
        }
    }

    /// Find the symbol containing `address`: the closest start at or below
    /// it, provided the address lies within that symbol's known extent.
    pub fn lookup(&self, address: u64) -> Option<(u64, &str)> {
        let (&start, entry) = self.symbols.range(..=address).next_back()?;
        match entry.size {
            Some(size) if address - start >= size => None,
            _ => Some((start, entry.name.as_str())),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
