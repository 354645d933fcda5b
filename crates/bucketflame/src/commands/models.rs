use crate::utils::config::DEFAULT_SUMMARY_PATH;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Profile JSON file or http(s) URL
    pub input: String,

    /// Output path for the summary JSON
    pub output: PathBuf,

    /// Rule table (TOML); built-in rules when absent
    pub rules: Option<PathBuf>,

    /// Symbolication server base URL
    pub symbol_server: Option<String>,

    /// Breakpad symbol store root
    pub symbols_dir: Option<PathBuf>,

    /// Directory holding native binaries
    pub binaries_dir: Option<PathBuf>,

    /// Only aggregate the thread with this name
    pub thread: Option<String>,

    /// Discard samples captured before navigation
    pub apply_skip: bool,

    /// Print the bucket report to stdout
    pub print_summary: bool,
}

impl AnalyzeArgs {
    /// Whether any symbol source was configured
    pub fn wants_symbols(&self) -> bool {
        self.symbol_server.is_some() || self.symbols_dir.is_some() || self.binaries_dir.is_some()
    }
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: PathBuf::from(DEFAULT_SUMMARY_PATH),
            rules: None,
            symbol_server: None,
            symbols_dir: None,
            binaries_dir: None,
            thread: None,
            apply_skip: true,
            print_summary: false,
        }
    }
}
