//! JSON summary writer.
//!
//! Writes [`Summary`] documents to disk with pretty formatting.

use crate::parser::Summary;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a summary to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is a directory
pub fn write_summary(summary: &Summary, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());
    super::validate_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    info!(
        "Summary written successfully ({} bytes)",
        file_size(output_path)
    );
    Ok(())
}

/// Serialize a summary to a pretty JSON string
pub fn summary_to_string(summary: &Summary) -> Result<String, OutputError> {
    serde_json::to_string_pretty(summary).map_err(OutputError::SerializationFailed)
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a summary back from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<Summary, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let summary: Summary =
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Summary loaded: version {}, {} threads",
        summary.version,
        summary.threads.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{BucketRecord, ThreadSummary};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn summary() -> Summary {
        Summary {
            version: "1.0.0".to_string(),
            url: Some("https://example.com/".to_string()),
            interval_ms: 1.0,
            categories: vec!["*".to_string(), "js".to_string()],
            threads: vec![ThreadSummary {
                name: "GeckoMain".to_string(),
                sample_count: 3,
                total_weight: 3,
                buckets: vec![BucketRecord {
                    category: "js".to_string(),
                    top_weight: 3,
                    tail_weight: 0,
                }],
                ..Default::default()
            }],
            generated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("summary.json");

        write_summary(&summary(), &path).unwrap();
        let back = read_summary(&path).unwrap();
        assert_eq!(back, summary());
    }

    #[test]
    fn test_directory_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            write_summary(&summary(), dir.path()),
            Err(OutputError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_read_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_summary(&path),
            Err(OutputError::SerializationFailed(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_summary(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, OutputError::ReadFailed(_)));
        assert!(err.to_string().starts_with("Failed to read file"));
    }
}
