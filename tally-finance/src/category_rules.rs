//! Applies the configured keyword rules to normalized transactions.

use tally_core::{CategorizedTransaction, CategoryRuleSet, Transaction};

/// Assigns a derived category to each transaction.
/// The source-provided category is kept on the transaction but never consulted.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    rules: CategoryRuleSet,
}

impl Categorizer {
    pub fn new(rules: CategoryRuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CategoryRuleSet {
        &self.rules
    }

    pub fn categorize(&self, description: &str) -> &str {
        self.rules.categorize(description)
    }

    /// Categorize a batch, preserving input order
    pub fn categorize_all<I>(&self, txns: I) -> Vec<CategorizedTransaction>
    where
        I: IntoIterator<Item = Transaction>,
    {
        txns.into_iter()
            .map(|txn| {
                let category = self.rules.categorize(&txn.description).to_string();
                CategorizedTransaction::new(txn, category)
            })
            .collect()
    }
}
