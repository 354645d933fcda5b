//! Local Breakpad symbol store.
//!
//! Layout: `<root>/<debugName>/<debugId>/<debugName minus .pdb>.sym`.
//! Only `FUNC` and `PUBLIC` records are read.

use super::table::SymbolTable;
use super::SymbolProvider;
use crate::parser::Library;
use crate::utils::error::SymbolError;
use log::{debug, info};
use std::path::{Path, PathBuf};

pub struct BreakpadStore {
    root: PathBuf,
}

impl BreakpadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location of the symbol file for `library`
    pub fn symbol_path(&self, library: &Library) -> Option<PathBuf> {
        let debug_name = library.debug_name();
        let debug_id = library.debug_id.as_deref()?;
        let stem = debug_name.strip_suffix(".pdb").unwrap_or(debug_name);

        Some(
            self.root
                .join(debug_name)
                .join(debug_id)
                .join(format!("{}.sym", stem)),
        )
    }
}

impl SymbolProvider for BreakpadStore {
    fn resolve_symbols(
        &self,
        library: &Library,
        _addresses: &[u64],
    ) -> Result<SymbolTable, SymbolError> {
        let path = self
            .symbol_path(library)
            .ok_or_else(|| SymbolError::NotFound(format!("{} (no debug id)", library.name)))?;

        if !path.exists() {
            return Err(SymbolError::NotFound(path.display().to_string()));
        }

        info!("Reading symbols from {}", path.display());
        load_symbol_file(&path)
    }
}

/// Read and parse a `.sym` file
pub fn load_symbol_file(path: &Path) -> Result<SymbolTable, SymbolError> {
    let text = std::fs::read_to_string(path)?;
    parse_symbol_file(&text)
}

/// Parse the `FUNC` and `PUBLIC` records of a Breakpad symbol file
///
/// ```text
/// FUNC [m] <address> <size> <param_size> <name>
/// PUBLIC [m] <address> <param_size> <name>
/// ```
pub fn parse_symbol_file(text: &str) -> Result<SymbolTable, SymbolError> {
    let mut table = SymbolTable::new();

    for (line_no, line) in text.lines().enumerate() {
        let (kind, rest) = match line.split_once(' ') {
            Some(("FUNC", rest)) => (RecordKind::Func, rest),
            Some(("PUBLIC", rest)) => (RecordKind::Public, rest),
            _ => continue,
        };
        let rest = rest.strip_prefix("m ").unwrap_or(rest);

        let record = parse_record(kind, rest).ok_or_else(|| {
            SymbolError::InvalidSymbolFile(format!("line {}: '{}'", line_no + 1, line))
        })?;
        table.insert(record.start, record.name, record.size);
    }

    debug!("Parsed {} symbols", table.len());
    Ok(table)
}

#[derive(Clone, Copy)]
enum RecordKind {
    Func,
    Public,
}

struct Record<'a> {
    start: u64,
    size: Option<u64>,
    name: &'a str,
}

fn parse_record(kind: RecordKind, rest: &str) -> Option<Record<'_>> {
    let field_count = match kind {
        RecordKind::Func => 4,
        RecordKind::Public => 3,
    };
    // The name is the remainder and may contain spaces
    let fields: Vec<&str> = rest.splitn(field_count, ' ').collect();
    if fields.len() != field_count {
        return None;
    }

    let start = u64::from_str_radix(fields[0], 16).ok()?;
    let size = match kind {
        RecordKind::Func => Some(u64::from_str_radix(fields[1], 16).ok()?),
        RecordKind::Public => None,
    };
    let name = fields[field_count - 1];

    Some(Record { start, size, name })
}
