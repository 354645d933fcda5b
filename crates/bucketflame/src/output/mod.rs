//! Output writers for summary data.
//!
//! This module handles:
//! - JSON summaries (pretty)
//! - Terminal bucket reports

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{read_summary, summary_to_string, write_summary};
pub use text::format_bucket_report;

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
