//! HTTP client for a Tecken-style symbolication server.

use super::table::SymbolTable;
use super::types::{parse_hex, SymbolicationRequest, SymbolicationResponse};
use super::SymbolProvider;
use crate::parser::Library;
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::SymbolError;
use log::{debug, info};
use reqwest::blocking::Client;

/// Symbol provider backed by `POST <server>/symbolicate/v5`
pub struct SymbolServerClient {
    client: Client,
    base_url: String,
}

impl SymbolServerClient {
    /// Create a new client for `base_url` (without the endpoint path)
    pub fn new(base_url: impl Into<String>) -> Result<Self, SymbolError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(SymbolError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/symbolicate/v5", self.base_url)
    }
}

impl SymbolProvider for SymbolServerClient {
    fn resolve_symbols(
        &self,
        library: &Library,
        addresses: &[u64],
    ) -> Result<SymbolTable, SymbolError> {
        let debug_name = library.debug_name();
        let debug_id = library
            .debug_id
            .as_deref()
            .ok_or_else(|| SymbolError::NotFound(format!("{} (no debug id)", debug_name)))?;

        info!(
            "Symbolicating {} addresses in {} via {}",
            addresses.len(),
            debug_name,
            self.base_url
        );

        let request = SymbolicationRequest::for_module(debug_name, debug_id, addresses);
        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .map_err(SymbolError::RequestFailed)?;

        if !response.status().is_success() {
            return Err(SymbolError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        let body: SymbolicationResponse = response.json().map_err(SymbolError::RequestFailed)?;
        table_from_response(&body, debug_name)
    }
}

/// Build a symbol table from a v5 response
///
/// Each resolved frame yields its symbol start
/// (`module_offset - function_offset`); the symbol's extent is widened to
/// cover every resolved offset.
pub fn table_from_response(
    response: &SymbolicationResponse,
    debug_name: &str,
) -> Result<SymbolTable, SymbolError> {
    let result = response
        .results
        .first()
        .ok_or_else(|| SymbolError::InvalidResponse("Missing results".to_string()))?;

    let found = result
        .found_modules
        .iter()
        .any(|(module, found)| module.starts_with(debug_name) && found.as_bool() == Some(true));
    if !found {
        return Err(SymbolError::NotFound(debug_name.to_string()));
    }

    let mut table = SymbolTable::new();
    for frame in result.stacks.iter().flatten() {
        let Some(function) = &frame.function else {
            continue;
        };
        let module_offset = parse_hex(&frame.module_offset).ok_or_else(|| {
            SymbolError::InvalidResponse(format!("Bad module_offset '{}'", frame.module_offset))
        })?;
        let function_offset = frame
            .function_offset
            .as_deref()
            .and_then(parse_hex)
            .unwrap_or(0);

        let start = module_offset.saturating_sub(function_offset);
        table.insert(start, function.as_str(), Some(function_offset + 1));
    }

    debug!("Server resolved {} symbols for {}", table.len(), debug_name);
    Ok(table)
}
