// medallion-core/src/domain/lookup/category.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::table::{Rule, RuleTable};

pub const UNCATEGORIZED: &str = "Não Categoria";

/// Case-sensitive substring test against the canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct CategoryRule {
    #[validate(length(min = 1, message = "Category pattern cannot be empty"))]
    pub pattern: String,
    #[validate(length(min = 1, message = "Category label cannot be empty"))]
    pub category: String,
}

impl CategoryRule {
    pub fn new(pattern: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
        }
    }
}

impl Rule for CategoryRule {
    type Input = str;

    fn matches(&self, input: &str) -> bool {
        input.contains(self.pattern.as_str())
    }

    fn output(&self) -> &str {
        &self.category
    }
}

#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    table: RuleTable<CategoryRule>,
    fallback: String,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(Vec::new(), UNCATEGORIZED)
    }
}

impl CategoryClassifier {
    pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Self {
        Self {
            table: RuleTable::new(rules),
            fallback: fallback.into(),
        }
    }

    /// Expects the canonical (renamed) name, never the raw export name.
    pub fn categorize(&self, canonical_name: &str) -> &str {
        self.table
            .first_match(canonical_name)
            .unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn rules(&self) -> &[CategoryRule] {
        self.table.rules()
    }
}
