//! Rule table files.
//!
//! Loads rule tables from TOML. Rules keep their file order:
//!
//! ```toml
//! [[rule]]
//! pattern = "^PresShell::Paint"
//! bucket = "paint"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::RuleSet;
use crate::utils::error::RuleError;
use log::{debug, info};

/// One uncompiled rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSpec {
    /// Regular expression matched against function names
    pub pattern: String,

    /// Bucket label; the category is the part before the first `:`
    pub bucket: String,
}

/// Complete rule file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RuleFile {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleSpec>,
}

impl RuleFile {
    /// Parse and compile a rule table from TOML text
    pub fn compile_str(contents: &str) -> Result<RuleSet, RuleError> {
        let file: RuleFile = toml::from_str(contents)?;
        debug!("Parsed {} rules", file.rules.len());
        RuleSet::new(file.rules)
    }
}

/// Load a rule table from a TOML file
///
/// # Arguments
/// * `path` - Path to the TOML rule file
///
/// # Errors
/// * `RuleError::IoError` - If file cannot be read
/// * `RuleError::ParseFailed` - If TOML is invalid
/// * `RuleError::InvalidPattern` - If a pattern does not compile
///
/// # Example
/// ```ignore
/// let rules = load_rules("rules.toml")?;
/// ```
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSet, RuleError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let rules = RuleFile::compile_str(&contents)?;
    info!(
        "Loaded {} rules ({} categories) from {}",
        rules.rules().len(),
        rules.category_count(),
        path.display()
    );
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RULES: &str = r#"
[[rule]]
pattern = "^Interpret"
bucket = "js:interpret"

[[rule]]
pattern = "Paint"
bucket = "paint"

[[rule]]
pattern = "^js::RunScript"
bucket = "js:run"
"#;

    #[test]
    fn test_compile_preserves_order() {
        let rules = RuleFile::compile_str(RULES).unwrap();
        let buckets: Vec<&str> = rules.rules().iter().map(|r| r.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["js:interpret", "paint", "js:run"]);
        assert_eq!(rules.categories(), &["*", "js", "paint"]);
    }

    #[test]
    fn test_empty_file() {
        let rules = RuleFile::compile_str("").unwrap();
        assert!(rules.rules().is_empty());
        assert_eq!(rules.category_count(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            RuleFile::compile_str("[[rule]]\npattern = 3"),
            Err(RuleError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_load_rules_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(RULES.as_bytes()).unwrap();
        let rules = load_rules(file.path()).unwrap();
        assert_eq!(rules.rules().len(), 3);
    }

    #[test]
    fn test_load_rules_missing_file() {
        assert!(matches!(
            load_rules("/nonexistent/rules.toml"),
            Err(RuleError::IoError(_))
        ));
    }
}
