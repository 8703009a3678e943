//! Ordered keyword rules mapping descriptions to spending categories.
//!
//! Rules are checked in declared order and the first category with a
//! matching keyword wins, so a description mentioning both a grocery and a
//! shopping keyword lands in whichever category was declared first.
//! Matching is a plain case-insensitive substring test: "target" also
//! matches inside longer words.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ConfigError;
use crate::finance::FALLBACK_CATEGORY;

/// One category and the keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Validated, immutable rule list. Keywords are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRuleSet {
    rules: Vec<CategoryRule>,
}

impl CategoryRuleSet {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(rules.len());

        for rule in rules {
            let name = rule.name.trim().to_string();
            if name.is_empty() {
                return Err(ConfigError::EmptyCategory);
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicateCategory(name));
            }

            let mut keywords = Vec::with_capacity(rule.keywords.len());
            for kw in rule.keywords {
                let kw = kw.trim().to_lowercase();
                // An empty keyword would match every description
                if kw.is_empty() {
                    return Err(ConfigError::EmptyKeyword(name));
                }
                keywords.push(kw);
            }

            out.push(CategoryRule { name, keywords });
        }

        Ok(Self { rules: out })
    }

    /// Built-in rules for a typical personal statement
    pub fn defaults() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Category for a description; `"Others"` when nothing matches.
    pub fn categorize(&self, description: &str) -> &str {
        let lowered = description.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lowered))
            .map(|r| r.name.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CategoryRuleSet {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Default keyword rules, in match order
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("Groceries", ["whole foods", "walmart", "costco", "target"]),
        CategoryRule::new("Utilities", ["city electric", "water utility"]),
        CategoryRule::new("Electronics", ["best buy", "apple store"]),
        CategoryRule::new("Entertainment", ["netflix", "spotify", "airbnb"]),
        CategoryRule::new("Health", ["cvs pharmacy", "gym membership"]),
        CategoryRule::new("Shopping", ["amazon", "local bookstore"]),
        CategoryRule::new("Coffee & Food", ["starbucks", "mcdonald's"]),
        CategoryRule::new("Transport", ["uber", "shell gas", "delta airlines"]),
    ]
}
