use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tally_core::{BudgetLimits, CategoryRuleSet, Period};
use tally_finance::anomaly::AnomalyDetector;
use tally_finance::pipeline::{Pipeline, RunOutput, Settings};
use tally_ingest::read_statement_csv;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("sample_bank_statement.csv")
}

fn run_for(year: i32, month: u32) -> RunOutput {
    let rows = read_statement_csv(sample_path()).expect("should read sample statement");
    Pipeline::default().run(rows, Period::Month { year, month })
}

/// Real-data regression: malformed and duplicate rows are dropped and counted.
#[test]
fn test_normalization_report() {
    let out = run_for(2026, 2);
    assert_eq!(out.report.rows_read, 28);
    assert_eq!(out.report.rejected_dates, 1);
    assert_eq!(out.report.rejected_amounts, 1);
    assert_eq!(out.report.duplicates_removed, 1);
    assert_eq!(out.report.kept(), 25);
    assert_eq!(out.transactions.len(), 25);
    assert!(out.transactions.iter().all(|t| t.transaction.description != "broken row"));
    assert!(out.transactions.windows(2).all(|w| w[0].date() <= w[1].date()));
}

#[test]
fn test_totals_and_invariants() {
    let agg = run_for(2026, 2).aggregates;
    assert_eq!(agg.total_income, dec!(12000.00));
    assert_eq!(agg.total_spending, dec!(-4084.22));
    assert!(agg.total_income >= Decimal::ZERO);
    assert!(agg.total_spending <= Decimal::ZERO);

    let by_cat_sum: Decimal = agg.spending_by_category.iter().map(|c| c.total).sum();
    assert_eq!(by_cat_sum, agg.total_spending);
}

#[test]
fn test_spending_by_category() {
    let agg = run_for(2026, 2).aggregates;
    let names: Vec<_> = agg.spending_by_category.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Others",
            "Electronics",
            "Groceries",
            "Transport",
            "Utilities",
            "Shopping",
            "Health",
            "Entertainment",
            "Coffee & Food",
        ]
    );
    assert_eq!(agg.spending_for("Groceries"), dec!(-928.70));
    assert_eq!(agg.spending_for("Transport"), dec!(-416.60));
    assert_eq!(agg.spending_for("Shopping"), dec!(-83.29));
}

#[test]
fn test_calendar_buckets() {
    let agg = run_for(2026, 2).aggregates;
    let months: Vec<_> = agg.monthly_totals.iter().map(|m| (m.label.as_str(), m.total)).collect();
    assert_eq!(
        months,
        vec![
            ("2025-11", dec!(2674.97)),
            ("2025-12", dec!(1496.95)),
            ("2026-01", dec!(2752.91)),
            ("2026-02", dec!(990.95)),
        ]
    );

    let quarters: Vec<_> = agg.quarterly_totals.iter().map(|q| (q.label.as_str(), q.total)).collect();
    assert_eq!(quarters, vec![("2025Q4", dec!(4171.92)), ("2026Q1", dec!(3743.86))]);

    let years: Vec<_> = agg.yearly_totals.iter().map(|y| (y.label.as_str(), y.total)).collect();
    assert_eq!(years, vec![("2025", dec!(4171.92)), ("2026", dec!(3743.86))]);
}

#[test]
fn test_daily_series_and_rolling_average() {
    let agg = run_for(2026, 2).aggregates;
    // 2025-11-01 ..= 2026-02-20
    assert_eq!(agg.daily_net.len(), 30 + 31 + 31 + 20);
    assert_eq!(agg.rolling_average.len(), agg.daily_net.len());
    assert!(agg.rolling_average[..29].iter().all(|p| p.average.is_none()));
    assert!(agg.rolling_average[29..].iter().all(|p| p.average.is_some()));

    // First full window: Nov 1..=30, net 2674.97 over 30 days
    let first = agg.rolling_average[29];
    assert_eq!(first.date.to_string(), "2025-11-30");
    assert_eq!(first.average.map(|a| a.round_dp(4)), Some(dec!(89.1657)));
}

#[test]
fn test_budget_alerts_for_february() {
    let out = run_for(2026, 2);
    let alerts: Vec<_> = out
        .alerts
        .iter()
        .map(|a| (a.category.as_str(), a.budget, a.spent))
        .collect();
    assert_eq!(
        alerts,
        vec![
            ("Groceries", dec!(500), dec!(540.75)),
            ("Electronics", dec!(200), dec!(250.00)),
            ("Others", dec!(100), dec!(1200.00)),
        ]
    );
    assert!(out.alerts.iter().all(|a| a.period == "2026-02"));
}

#[test]
fn test_budget_alerts_for_december() {
    let out = run_for(2025, 12);
    let cats: Vec<_> = out.alerts.iter().map(|a| a.category.as_str()).collect();
    assert_eq!(cats, vec!["Electronics", "Transport"]);
}

#[test]
fn test_month_without_transactions_has_no_alerts() {
    let out = run_for(2024, 6);
    assert!(out.alerts.is_empty());
    assert!(out.period_spending.is_empty());
    assert!(out.budget_status.iter().all(|s| s.spent == Decimal::ZERO));
}

#[test]
fn test_monthly_anomalies() {
    let out = run_for(2026, 2);
    // Deviations stay inside 1.5 sigma for this statement
    assert!(out.monthly_anomalies.is_empty());

    let strict = AnomalyDetector::new(dec!(1.0)).detect_periods(&out.aggregates.monthly_totals);
    let labels: Vec<_> = strict.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["2026-01", "2026-02"]);
}

#[test]
fn test_custom_rules_change_first_match() {
    let rows = read_statement_csv(sample_path()).unwrap();
    let rules = CategoryRuleSet::new(vec![
        tally_core::CategoryRule::new("Travel", ["delta airlines", "uber"]),
        tally_core::CategoryRule::new("Transport", ["shell gas", "uber"]),
    ])
    .unwrap();
    let pipeline = Pipeline::new(rules, BudgetLimits::defaults(), Settings::default());
    let out = pipeline.run(rows, Period::Month { year: 2026, month: 1 });

    assert_eq!(out.aggregates.spending_for("Travel"), dec!(-374.50));
    assert_eq!(out.aggregates.spending_for("Transport"), dec!(-42.10));
    // Everything else falls back
    assert_eq!(out.aggregates.spending_for("Groceries"), Decimal::ZERO);
}

#[test]
fn test_source_categories_are_title_cased() {
    let out = run_for(2026, 2);
    let names: Vec<_> = out.source_categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names.first().copied(), Some("Income"));
    assert!(names.contains(&"Coffee & Food"));
    assert!(!names.contains(&"groceries"));
}
