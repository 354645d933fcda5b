//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in commands and the binary.

use thiserror::Error;

/// Errors that can occur while fetching a profile over HTTP
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors that can occur during profile parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid profile format: {0}")]
    InvalidFormat(String),
}

/// Structural-integrity errors raised while aggregating one thread
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Malformed stack tree: walk from node {node} exceeded {limit} steps (cyclic parent chain)")]
    MalformedStackTree { node: usize, limit: usize },

    #[error("Stack reference {index} out of range (stack table has {len} nodes)")]
    StackOutOfRange { index: usize, len: usize },

    #[error("Function reference {index} out of range (function table has {len} entries)")]
    FuncOutOfRange { index: usize, len: usize },

    #[error("String reference {index} out of range (string table has {len} entries)")]
    StringOutOfRange { index: usize, len: usize },
}

/// Errors that can occur while loading a category rule table
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid bucket name '{0}'")]
    InvalidBucket(String),

    #[error("Too many categories ({0})")]
    TooManyCategories(usize),

    #[error("Rule TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during symbol resolution
#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid symbol server response: {0}")]
    InvalidResponse(String),

    #[error("No symbols found for {0}")]
    NotFound(String),

    #[error("Invalid symbol file: {0}")]
    InvalidSymbolFile(String),

    #[error("Failed to parse binary: {0}")]
    ObjectFailed(#[from] object::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
