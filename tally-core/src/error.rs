use thiserror::Error;

/// Invalid category rules, budgets or period labels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("category name must not be empty")]
    EmptyCategory,
    #[error("category declared more than once: {0}")]
    DuplicateCategory(String),
    #[error("category {0} has an empty keyword")]
    EmptyKeyword(String),
    #[error("budget for {category} must not be negative (got {limit})")]
    NegativeLimit { category: String, limit: String },
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
}
