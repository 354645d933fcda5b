//! Category rule table.
//!
//! An ordered list of `{pattern, bucket}` entries. Order is a total
//! priority order: the first matching rule wins. The category of a rule is
//! its bucket name up to the first `:`; the category set is the catch-all
//! `*` followed by every distinct rule category in order of appearance.

pub mod defaults;
pub mod loader;

pub use defaults::DEFAULT_RULES;
pub use loader::{load_rules, RuleFile, RuleSpec};

use crate::utils::config::{CATCH_ALL_CATEGORY, CATEGORY_SEPARATOR};
use crate::utils::error::RuleError;
use regex::Regex;

/// Index into a [`RuleSet`]'s category set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub u16);

impl CategoryId {
    /// The synthetic "no rule matched" category
    pub const CATCH_ALL: CategoryId = CategoryId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_catch_all(self) -> bool {
        self == Self::CATCH_ALL
    }
}

/// A compiled rule
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub pattern: Regex,
    pub bucket: String,
    pub category: CategoryId,
}

impl CategoryRule {
    pub fn matches(&self, function_name: &str) -> bool {
        self.pattern.is_match(function_name)
    }
}

/// Immutable, compiled rule table
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
    categories: Vec<String>,
}

impl RuleSet {
    /// Compile rule specs, preserving their order
    ///
    /// # Errors
    /// * `RuleError::InvalidPattern` - A pattern is not a valid regular expression
    /// * `RuleError::InvalidBucket` - A bucket has an empty or reserved category
    pub fn new(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self, RuleError> {
        let mut categories = vec![CATCH_ALL_CATEGORY.to_string()];
        let mut rules = Vec::new();

        for spec in specs {
            let category_name = category_of(&spec.bucket);
            if category_name.is_empty() || category_name == CATCH_ALL_CATEGORY {
                return Err(RuleError::InvalidBucket(spec.bucket));
            }

            let pattern = Regex::new(&spec.pattern).map_err(|source| RuleError::InvalidPattern {
                pattern: spec.pattern.clone(),
                source,
            })?;

            let index = match categories.iter().position(|c| c == category_name) {
                Some(index) => index,
                None => {
                    categories.push(category_name.to_string());
                    categories.len() - 1
                }
            };
            let id = u16::try_from(index)
                .map_err(|_| RuleError::TooManyCategories(categories.len()))?;

            rules.push(CategoryRule {
                pattern,
                bucket: spec.bucket,
                category: CategoryId(id),
            });
        }

        Ok(Self { rules, categories })
    }

    /// The built-in table
    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(DEFAULT_RULES.iter().map(|(pattern, bucket)| RuleSpec {
            pattern: pattern.to_string(),
            bucket: bucket.to_string(),
        }))
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category names, indexed by [`CategoryId`]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn category_name(&self, id: CategoryId) -> &str {
        self.categories
            .get(id.index())
            .map(String::as_str)
            .unwrap_or(CATCH_ALL_CATEGORY)
    }

    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .position(|c| c == name)
            .and_then(|i| u16::try_from(i).ok())
            .map(CategoryId)
    }
}

/// Category part of a bucket name
pub fn category_of(bucket: &str) -> &str {
    bucket
        .split(CATEGORY_SEPARATOR)
        .next()
        .unwrap_or(bucket)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(pattern: &str, bucket: &str) -> RuleSpec {
        RuleSpec {
            pattern: pattern.to_string(),
            bucket: bucket.to_string(),
        }
    }

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("css:resolve"), "css");
        assert_eq!(category_of("js:run:*"), "js");
        assert_eq!(category_of("reflow"), "reflow");
    }

    #[test]
    fn test_category_set_order() {
        let rules = RuleSet::new(vec![
            spec("^a", "js:run"),
            spec("^b", "css:resolve"),
            spec("^c", "js:ion"),
        ])
        .unwrap();

        assert_eq!(rules.categories(), &["*", "js", "css"]);
        assert_eq!(rules.rules()[0].category, CategoryId(1));
        assert_eq!(rules.rules()[1].category, CategoryId(2));
        assert_eq!(rules.rules()[2].category, CategoryId(1));
        assert_eq!(rules.category_id("css"), Some(CategoryId(2)));
        assert_eq!(rules.category_name(CategoryId::CATCH_ALL), "*");
        assert!(CategoryId::CATCH_ALL.is_catch_all());
        assert!(!rules.category_id("js").unwrap().is_catch_all());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RuleSet::new(vec![spec("(unclosed", "js")]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_reserved_bucket() {
        assert!(RuleSet::new(vec![spec("^a", "*")]).is_err());
        assert!(RuleSet::new(vec![spec("^a", ":detail")]).is_err());
    }

    #[test]
    fn test_builtin_compiles() {
        let rules = RuleSet::builtin().unwrap();
        assert_eq!(rules.rules().len(), DEFAULT_RULES.len());
        assert_eq!(rules.categories()[0], "*");
        assert!(rules.category_id("gc").is_some());
    }
}
