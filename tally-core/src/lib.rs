//! tally-core: data model shared by the ingest, finance and CLI crates

pub mod budget;
pub mod error;
pub mod finance;
pub mod rules;
pub mod time;

pub use budget::{AlertEvent, BudgetLimit, BudgetLimits};
pub use error::ConfigError;
pub use finance::{
    CategorizedTransaction, Transaction, DEFAULT_MERCHANT_CODE, DEFAULT_NOTES, FALLBACK_CATEGORY,
};
pub use rules::{CategoryRule, CategoryRuleSet};
pub use time::Period;

// Monetary amounts are exact decimals throughout the workspace
pub use rust_decimal::Decimal;
