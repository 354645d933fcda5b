//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{analyze_value, execute_analyze, validate_args};
pub use models::AnalyzeArgs;
pub use utils::{display_rules, display_schema, display_version, validate_summary_file};
