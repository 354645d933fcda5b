//! Symbolication from local binaries.
//!
//! Symbol starts come from the object file's symbol table. Addresses the
//! symbol table does not cover fall back to DWARF line info, where the
//! outermost (non-inlined) frame names the function.

use super::table::SymbolTable;
use super::SymbolProvider;
use crate::parser::Library;
use crate::utils::error::SymbolError;
use addr2line::Context;
use log::{debug, info};
use object::{Object, ObjectSymbol, SymbolKind};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

type Reader = addr2line::gimli::EndianReader<addr2line::gimli::RunTimeEndian, std::rc::Rc<[u8]>>;

/// Provider reading binaries from a directory (or their recorded paths)
pub struct BinaryProvider {
    dir: PathBuf,
}

impl BinaryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// First existing candidate for `library`'s binary
    pub fn locate(&self, library: &Library) -> Option<PathBuf> {
        let mut candidates = vec![
            self.dir.join(&library.name),
            self.dir.join(library.debug_name()),
        ];
        candidates.extend(library.debug_path.iter().map(PathBuf::from));
        candidates.extend(library.path.iter().map(PathBuf::from));

        candidates.into_iter().find(|path| path.is_file())
    }
}

impl SymbolProvider for BinaryProvider {
    fn resolve_symbols(
        &self,
        library: &Library,
        addresses: &[u64],
    ) -> Result<SymbolTable, SymbolError> {
        let path = self
            .locate(library)
            .ok_or_else(|| SymbolError::NotFound(library.name.clone()))?;
        load_binary_symbols(&path, addresses)
    }
}

/// Build a symbol table for `addresses` (library-relative) from a binary
pub fn load_binary_symbols(path: &Path, addresses: &[u64]) -> Result<SymbolTable, SymbolError> {
    info!("Loading binary for symbolication: {}", path.display());

    let file_data = std::fs::read(path)?;
    let obj = object::File::parse(&*file_data)?;
    let base = obj.relative_address_base();

    let mut table = SymbolTable::new();
    for symbol in obj.symbols() {
        if symbol.kind() != SymbolKind::Text || symbol.address() < base {
            continue;
        }
        let Ok(name) = symbol.name() else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let size = (symbol.size() > 0).then_some(symbol.size());
        let demangled = addr2line::demangle_auto(Cow::Borrowed(name), None);
        table.insert(symbol.address() - base, demangled.into_owned(), size);
    }
    debug!("Symbol table of {} holds {} entries", path.display(), table.len());

    let unresolved: Vec<u64> = addresses
        .iter()
        .copied()
        .filter(|&address| table.lookup(address).is_none())
        .collect();
    if unresolved.is_empty() {
        return Ok(table);
    }

    match Context::new(&obj) {
        Ok(context) => {
            for address in unresolved {
                if let Some(name) = dwarf_function(&context, address + base) {
                    table.insert(address, name, Some(1));
                }
            }
        }
        Err(e) => debug!("No DWARF data in {}: {}", path.display(), e),
    }

    Ok(table)
}

/// Name of the outermost function containing `probe`
fn dwarf_function(context: &Context<Reader>, probe: u64) -> Option<String> {
    let mut frames = context.find_frames(probe).skip_all_loads().ok()?;
    let mut outermost = None;

    while let Ok(Some(frame)) = frames.next() {
        if let Some(function) = frame.function {
            if let Ok(name) = function.demangle() {
                outermost = Some(name.into_owned());
            }
        }
    }

    outermost
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_prefers_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("libxul.so"), b"not an elf").unwrap();

        let provider = BinaryProvider::new(dir.path());
        let library = Library {
            name: "libxul.so".to_string(),
            path: Some("/nonexistent/libxul.so".to_string()),
            ..Default::default()
        };
        assert_eq!(provider.locate(&library), Some(dir.path().join("libxul.so")));
    }

    #[test]
    fn test_missing_binary() {
        let dir = TempDir::new().unwrap();
        let provider = BinaryProvider::new(dir.path());
        let library = Library {
            name: "libmissing.so".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            provider.resolve_symbols(&library, &[0x10]),
            Err(SymbolError::NotFound(_))
        ));
    }

    #[test]
    fn test_unparseable_binary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.so");
        std::fs::write(&path, b"definitely not an object file").unwrap();
        assert!(matches!(
            load_binary_symbols(&path, &[0x10]),
            Err(SymbolError::ObjectFailed(_))
        ));
    }
}
