//! Types for the symbolication server's `/symbolicate/v5` endpoint.

use serde::{Deserialize, Serialize};

/// Request body: one or more independent jobs
#[derive(Debug, Clone, Serialize)]
pub struct SymbolicationRequest {
    pub jobs: Vec<SymbolicationJob>,
}

/// A job lists modules and stacks of `[module_index, module_offset]` pairs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolicationJob {
    pub memory_map: Vec<(String, String)>,
    pub stacks: Vec<Vec<(usize, u64)>>,
}

impl SymbolicationRequest {
    /// Create a single-module request resolving `addresses`
    pub fn for_module(debug_name: &str, debug_id: &str, addresses: &[u64]) -> Self {
        Self {
            jobs: vec![SymbolicationJob {
                memory_map: vec![(debug_name.to_string(), debug_id.to_string())],
                stacks: vec![addresses.iter().map(|&address| (0, address)).collect()],
            }],
        }
    }
}

/// Response body, one result per job
#[derive(Debug, Deserialize)]
pub struct SymbolicationResponse {
    #[serde(default)]
    pub results: Vec<SymbolicationResult>,
}

#[derive(Debug, Deserialize)]
pub struct SymbolicationResult {
    #[serde(default)]
    pub stacks: Vec<Vec<SymbolicatedFrame>>,

    #[serde(default)]
    pub found_modules: serde_json::Map<String, serde_json::Value>,
}

/// One resolved frame; offsets are `0x`-prefixed hex strings
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolicatedFrame {
    #[serde(default)]
    pub frame: Option<usize>,

    #[serde(default)]
    pub module: Option<String>,

    pub module_offset: String,

    #[serde(default)]
    pub function: Option<String>,

    #[serde(default)]
    pub function_offset: Option<String>,
}

/// Parse a `0x`-prefixed (or bare) hexadecimal offset
pub fn parse_hex(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).ok()
}
