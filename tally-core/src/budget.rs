//! Monthly budget limits and the alert events raised against them

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ConfigError;

/// Monthly ceiling for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLimit {
    pub category: String,
    /// Written as a plain TOML number in config files
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
}

impl BudgetLimit {
    pub fn new(category: impl Into<String>, limit: Decimal) -> Self {
        Self {
            category: category.into(),
            limit,
        }
    }
}

/// Validated budget table. Declared order is the evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetLimits {
    limits: Vec<BudgetLimit>,
}

impl BudgetLimits {
    pub fn new(limits: Vec<BudgetLimit>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(limits.len());

        for b in limits {
            let category = b.category.trim().to_string();
            if category.is_empty() {
                return Err(ConfigError::EmptyCategory);
            }
            if b.limit.is_sign_negative() && !b.limit.is_zero() {
                return Err(ConfigError::NegativeLimit {
                    category,
                    limit: b.limit.to_string(),
                });
            }
            if !seen.insert(category.clone()) {
                return Err(ConfigError::DuplicateCategory(category));
            }
            out.push(BudgetLimit {
                category,
                limit: b.limit,
            });
        }

        Ok(Self { limits: out })
    }

    pub fn defaults() -> Self {
        Self {
            limits: default_limits(),
        }
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.limits
            .iter()
            .find(|b| b.category == category)
            .map(|b| b.limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BudgetLimit> {
        self.limits.iter()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self::defaults()
    }
}

pub fn default_limits() -> Vec<BudgetLimit> {
    [
        ("Groceries", 500),
        ("Utilities", 150),
        ("Electronics", 200),
        ("Entertainment", 100),
        ("Health", 100),
        ("Shopping", 300),
        ("Coffee & Food", 150),
        ("Transport", 100),
        ("Others", 100),
    ]
    .into_iter()
    .map(|(c, l)| BudgetLimit::new(c, Decimal::from(l)))
    .collect()
}

/// Spend exceeded the budget for a category in a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    /// Period label, e.g. "2026-02"
    pub period: String,
}

impl AlertEvent {
    /// Amount spent beyond the budget
    pub fn overage(&self) -> Decimal {
        self.spent - self.budget
    }

    pub fn subject(&self) -> String {
        format!("Budget Alert: {}", self.category)
    }

    pub fn message(&self) -> String {
        format!(
            "Alert! You have exceeded your budget for {}. Budget: ${}, Spent: ${:.2}",
            self.category, self.budget, self.spent
        )
    }
}
