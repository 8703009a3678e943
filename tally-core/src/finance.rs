//! Transaction types for a single statement run

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Merchant code used when the statement row has none
pub const DEFAULT_MERCHANT_CODE: &str = "unknown";
/// Notes used when the statement row has none
pub const DEFAULT_NOTES: &str = "No notes provided";
/// Category assigned when no keyword rule matches
pub const FALLBACK_CATEGORY: &str = "Others";

/// A normalized statement transaction. Never mutated after normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Transaction {
    /// Calendar date of the transaction
    pub date: NaiveDate,
    /// Positive = income, negative = expense
    pub amount: Decimal,
    /// Trimmed, lower-cased description
    pub description: String,
    pub merchant_code: String,
    pub notes: String,
    /// Source-provided category, title-cased
    pub raw_category: Option<String>,
}

impl Transaction {
    /// Create a transaction with default merchant code and notes
    pub fn new(date: NaiveDate, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
            merchant_code: DEFAULT_MERCHANT_CODE.to_string(),
            notes: DEFAULT_NOTES.to_string(),
            raw_category: None,
        }
    }

    pub fn with_raw_category(mut self, category: impl Into<String>) -> Self {
        self.raw_category = Some(category.into());
        self
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }
}

/// A transaction plus the category derived from its description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: String,
}

impl CategorizedTransaction {
    pub fn new(transaction: Transaction, category: impl Into<String>) -> Self {
        Self {
            transaction,
            category: category.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }

    pub fn amount(&self) -> Decimal {
        self.transaction.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_defaults() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let txn = Transaction::new(date, dec!(-45.10), "whole foods market");
        assert_eq!(txn.merchant_code, "unknown");
        assert_eq!(txn.notes, "No notes provided");
        assert!(txn.raw_category.is_none());
        assert!(txn.is_expense());
        assert!(!txn.is_income());
    }

    #[test]
    fn test_zero_amount_is_neither() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let txn = Transaction::new(date, dec!(0.00), "adjustment");
        assert!(!txn.is_expense());
        assert!(!txn.is_income());
    }

    #[test]
    fn test_categorized_flattens_on_serialize() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let txn = CategorizedTransaction::new(Transaction::new(date, dec!(12), "payroll"), "Others");
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["category"], "Others");
        assert_eq!(json["description"], "payroll");
        assert_eq!(json["date"], "2026-02-18");
    }
}
