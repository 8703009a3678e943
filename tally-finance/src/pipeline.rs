//! Sequential run: normalize -> categorize -> aggregate -> detect -> evaluate.
//!
//! Each stage returns a new value; nothing is mutated in place and nothing
//! is delivered. Callers pass the alerts to `notify::dispatch`.

use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::{AlertEvent, BudgetLimits, CategorizedTransaction, CategoryRuleSet, Period};
use tally_ingest::{NormalizeReport, Normalized, RawRow, normalize};

use crate::aggregator::{Aggregates, CategoryTotal, DEFAULT_ROLLING_WINDOW, spending_in_period};
use crate::anomaly::{AnomalyDetector, DEFAULT_THRESHOLD, PeriodAnomaly};
use crate::budget::{BudgetEvaluator, BudgetStatus};
use crate::category_rules::Categorizer;
use crate::stats::{self, CategoryShare, SeriesSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub rolling_window: usize,
    pub anomaly_threshold: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rolling_window: DEFAULT_ROLLING_WINDOW,
            anomaly_threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Everything one run produces, for reporting and delivery
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub report: NormalizeReport,
    pub transactions: Vec<CategorizedTransaction>,
    pub aggregates: Aggregates,
    /// Days in each rolling-average window
    pub rolling_window: usize,
    pub category_shares: Vec<CategoryShare>,
    pub source_categories: Vec<CategoryTotal>,
    pub monthly_summary: Option<SeriesSummary>,
    pub monthly_change: Vec<Option<Decimal>>,
    pub monthly_anomalies: Vec<PeriodAnomaly>,
    /// Evaluation month label
    pub period: String,
    pub period_spending: Vec<CategoryTotal>,
    pub budget_status: Vec<BudgetStatus>,
    pub alerts: Vec<AlertEvent>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    categorizer: Categorizer,
    evaluator: BudgetEvaluator,
    detector: AnomalyDetector,
    rolling_window: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(CategoryRuleSet::defaults(), BudgetLimits::defaults(), Settings::default())
    }
}

impl Pipeline {
    pub fn new(rules: CategoryRuleSet, budgets: BudgetLimits, settings: Settings) -> Self {
        Self {
            categorizer: Categorizer::new(rules),
            evaluator: BudgetEvaluator::new(budgets),
            detector: AnomalyDetector::new(settings.anomaly_threshold),
            rolling_window: settings.rolling_window,
        }
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    /// Run over raw statement rows; `period` is the budget evaluation month
    pub fn run(&self, rows: Vec<RawRow>, period: Period) -> RunOutput {
        self.run_normalized(normalize(rows), period)
    }

    pub fn run_normalized(&self, normalized: Normalized, period: Period) -> RunOutput {
        let Normalized {
            transactions,
            report,
        } = normalized;

        let categorized = self.categorizer.categorize_all(transactions);
        let aggregates = Aggregates::compute(&categorized, self.rolling_window);

        let monthly: Vec<Decimal> = aggregates.monthly_totals.iter().map(|m| m.total).collect();
        let monthly_anomalies = self.detector.detect_periods(&aggregates.monthly_totals);

        let period_spending = spending_in_period(&categorized, period);
        let budget_status = self.evaluator.status(&period_spending);
        let alerts = self.evaluator.evaluate(&period_spending, period);

        tracing::info!(
            transactions = categorized.len(),
            months = monthly.len(),
            anomalies = monthly_anomalies.len(),
            alerts = alerts.len(),
            period = %period,
            "pipeline complete"
        );

        RunOutput {
            report,
            category_shares: stats::category_shares(&aggregates.spending_by_category),
            source_categories: stats::top_source_categories(&categorized),
            monthly_summary: stats::summarize(&monthly),
            monthly_change: stats::percent_change(&monthly),
            monthly_anomalies,
            period: period.label(),
            period_spending,
            budget_status,
            alerts,
            transactions: categorized,
            aggregates,
            rolling_window: self.rolling_window.max(1),
        }
    }
}
