//! Native symbolication.
//!
//! Raw profiles name native functions by hex address. A [`SymbolProvider`]
//! turns library-relative addresses into function names; the
//! [`symbolicate_thread`] pass applies them to a thread before aggregation.

pub mod binary;
pub mod breakpad;
pub mod server;
pub mod symbolicate;
pub mod table;
pub mod types;

pub use binary::BinaryProvider;
pub use breakpad::BreakpadStore;
pub use server::SymbolServerClient;
pub use symbolicate::{symbolicate_thread, SymbolicationReport};
pub use table::{SymbolEntry, SymbolTable};

use crate::parser::Library;
use crate::utils::error::SymbolError;

/// A source of symbols for one library at a time
pub trait SymbolProvider {
    /// Symbols covering `addresses` (library-relative) in `library`
    ///
    /// Providers may return more symbols than asked for.
    fn resolve_symbols(
        &self,
        library: &Library,
        addresses: &[u64],
    ) -> Result<SymbolTable, SymbolError>;
}

/// Tries each provider in order until one succeeds
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn SymbolProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: Box<dyn SymbolProvider>) {
        self.providers.push(provider);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl SymbolProvider for ProviderChain {
    fn resolve_symbols(
        &self,
        library: &Library,
        addresses: &[u64],
    ) -> Result<SymbolTable, SymbolError> {
        let mut last_error = SymbolError::NotFound(library.name.clone());
        for provider in &self.providers {
            match provider.resolve_symbols(library, addresses) {
                Ok(table) => return Ok(table),
                Err(e) => {
                    log::debug!("Provider failed for {}: {}", library.name, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
