//! Budget evaluation for one calendar month.
//!
//! Only categories listed in the budget table are checked, in table order.
//! Spending in unbudgeted categories is ignored. Evaluation never sends
//! anything; delivery is `crate::notify`'s job.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{AlertEvent, BudgetLimits, CategorizedTransaction, Period};

use crate::aggregator::{CategoryTotal, category_total, spending_in_period};

/// Spend against limit for one budgeted category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
}

impl BudgetStatus {
    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }

    /// Negative once over budget
    pub fn remaining(&self) -> Decimal {
        self.limit - self.spent
    }
}

#[derive(Debug, Clone, Default)]
pub struct BudgetEvaluator {
    limits: BudgetLimits,
}

impl BudgetEvaluator {
    pub fn new(limits: BudgetLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &BudgetLimits {
        &self.limits
    }

    /// Status of every budgeted category, zero-spend ones included
    pub fn status(&self, spending: &[CategoryTotal]) -> Vec<BudgetStatus> {
        self.limits
            .iter()
            .map(|b| BudgetStatus {
                category: b.category.clone(),
                limit: b.limit,
                spent: category_total(spending, &b.category).abs(),
            })
            .collect()
    }

    /// Alerts for categories whose spend in `period` exceeds the limit.
    /// `spending` must already be scoped to `period`.
    pub fn evaluate(&self, spending: &[CategoryTotal], period: Period) -> Vec<AlertEvent> {
        let label = period.label();
        self.status(spending)
            .into_iter()
            .filter(BudgetStatus::is_over)
            .map(|s| AlertEvent {
                category: s.category,
                budget: s.limit,
                spent: s.spent,
                period: label.clone(),
            })
            .collect()
    }

    /// Scope transactions to the period's calendar month, then evaluate
    pub fn evaluate_transactions(
        &self,
        txns: &[CategorizedTransaction],
        period: Period,
    ) -> Vec<AlertEvent> {
        let alerts = self.evaluate(&spending_in_period(txns, period), period);
        tracing::debug!(period = %period, alerts = alerts.len(), "evaluated budgets");
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_core::{BudgetLimit, Transaction};

    fn feb() -> Period {
        Period::Month { year: 2026, month: 2 }
    }

    fn groceries_only() -> BudgetEvaluator {
        BudgetEvaluator::new(BudgetLimits::new(vec![BudgetLimit::new("Groceries", dec!(500))]).unwrap())
    }

    #[test]
    fn test_over_budget_emits_one_alert() {
        let spending = vec![CategoryTotal::new("Groceries", dec!(-520))];
        let alerts = groceries_only().evaluate(&spending, feb());
        assert_eq!(
            alerts,
            vec![AlertEvent {
                category: "Groceries".to_string(),
                budget: dec!(500),
                spent: dec!(520),
                period: "2026-02".to_string(),
            }]
        );
    }

    #[test]
    fn test_under_or_at_budget_is_quiet() {
        let under = vec![CategoryTotal::new("Groceries", dec!(-400))];
        assert!(groceries_only().evaluate(&under, feb()).is_empty());

        let exact = vec![CategoryTotal::new("Groceries", dec!(-500))];
        assert!(groceries_only().evaluate(&exact, feb()).is_empty());
    }

    #[test]
    fn test_unbudgeted_category_ignored() {
        let spending = vec![CategoryTotal::new("Casino", dec!(-9999))];
        assert!(groceries_only().evaluate(&spending, feb()).is_empty());
    }

    #[test]
    fn test_zero_spend_categories_reported_in_status() {
        let status = BudgetEvaluator::default().status(&[]);
        assert_eq!(status.len(), 9);
        assert!(status.iter().all(|s| s.spent == Decimal::ZERO && !s.is_over()));
    }

    #[test]
    fn test_zero_budget_alerts_on_any_spend() {
        let eval = BudgetEvaluator::new(BudgetLimits::new(vec![BudgetLimit::new("Others", dec!(0))]).unwrap());
        let alerts = eval.evaluate(&[CategoryTotal::new("Others", dec!(-0.01))], feb());
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_alert_order_follows_budget_table() {
        let eval = BudgetEvaluator::new(
            BudgetLimits::new(vec![
                BudgetLimit::new("Transport", dec!(10)),
                BudgetLimit::new("Groceries", dec!(10)),
                BudgetLimit::new("Health", dec!(10)),
            ])
            .unwrap(),
        );
        let spending = vec![
            CategoryTotal::new("Groceries", dec!(-50)),
            CategoryTotal::new("Health", dec!(-20)),
            CategoryTotal::new("Transport", dec!(-11)),
        ];
        let cats: Vec<_> = eval.evaluate(&spending, feb()).into_iter().map(|a| a.category).collect();
        assert_eq!(cats, vec!["Transport", "Groceries", "Health"]);
    }

    #[test]
    fn test_evaluate_transactions_uses_calendar_month() {
        let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
        let txns = vec![
            CategorizedTransaction::new(Transaction::new(d(1, 31), dec!(-450), "costco"), "Groceries"),
            CategorizedTransaction::new(Transaction::new(d(2, 1), dec!(-300), "costco"), "Groceries"),
            CategorizedTransaction::new(Transaction::new(d(2, 28), dec!(-250), "walmart"), "Groceries"),
            CategorizedTransaction::new(Transaction::new(d(3, 1), dec!(-999), "walmart"), "Groceries"),
        ];
        let alerts = groceries_only().evaluate_transactions(&txns, feb());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].spent, dec!(550));

        let jan = groceries_only().evaluate_transactions(&txns, Period::Month { year: 2026, month: 1 });
        assert!(jan.is_empty());
    }
}
