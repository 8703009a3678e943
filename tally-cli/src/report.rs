//! Plain-text rendering of a run for the terminal.

use rust_decimal::Decimal;
use std::fmt::Write;
use tally_finance::RunOutput;

/// Trailing rolling-average points shown in the text report
const ROLLING_TAIL: usize = 7;

fn money(d: Decimal) -> String {
    format!("${:.2}", d)
}

pub fn render(out: &RunOutput) -> String {
    let mut s = String::new();
    let agg = &out.aggregates;
    let r = &out.report;

    // Writing to a String cannot fail
    let _ = writeln!(s, "# Statement summary\n");
    let _ = writeln!(
        s,
        "Rows: {} read, {} kept, {} bad date, {} bad amount, {} duplicate",
        r.rows_read,
        r.kept(),
        r.rejected_dates,
        r.rejected_amounts,
        r.duplicates_removed
    );
    let _ = writeln!(
        s,
        "Unique dates: {} | unique descriptions: {}\n",
        r.unique_dates, r.unique_descriptions
    );

    let _ = writeln!(s, "Total income:   {}", money(agg.total_income));
    let _ = writeln!(s, "Total spending: {}\n", money(agg.total_spending.abs()));

    let _ = writeln!(s, "## Spending by category\n");
    for (c, share) in agg.spending_by_category.iter().zip(&out.category_shares) {
        let _ = writeln!(
            s,
            "- {:<16} {:>12}  ({:.1}%)",
            c.category,
            money(c.total.abs()),
            share.percent
        );
    }

    let _ = writeln!(s, "\n## Monthly net\n");
    for (i, m) in agg.monthly_totals.iter().enumerate() {
        let change = match i.checked_sub(1).and_then(|j| out.monthly_change.get(j)) {
            Some(Some(pct)) => format!("{:+.1}%", pct),
            Some(None) => "n/a".to_string(),
            None => String::new(),
        };
        let _ = writeln!(s, "- {}  {:>12}  {}", m.label, money(m.total), change);
    }

    let _ = writeln!(s, "\n## Quarterly net\n");
    for q in &agg.quarterly_totals {
        let _ = writeln!(s, "- {}  {:>12}", q.label, money(q.total));
    }

    let _ = writeln!(s, "\n## Yearly net\n");
    for y in &agg.yearly_totals {
        let _ = writeln!(s, "- {}  {:>12}", y.label, money(y.total));
    }

    let rolling: Vec<_> = agg.defined_rolling().collect();
    let _ = writeln!(
        s,
        "\n## Rolling {}-day average (last {ROLLING_TAIL} days)\n",
        out.rolling_window
    );
    if rolling.is_empty() {
        let _ = writeln!(s, "(not enough days for a full window)");
    }
    for (date, avg) in rolling.iter().rev().take(ROLLING_TAIL).rev() {
        let _ = writeln!(s, "- {}  {:>12}", date, money(*avg));
    }

    let _ = writeln!(s, "\n## Monthly statistics\n");
    match &out.monthly_summary {
        Some(st) => {
            let _ = writeln!(
                s,
                "mean {} | median {} | std dev {} | min {} | max {}",
                money(st.mean),
                money(st.median),
                money(st.std_dev),
                money(st.min),
                money(st.max)
            );
        }
        None => {
            let _ = writeln!(s, "(no months)");
        }
    }

    let _ = writeln!(s, "\n## Irregular months\n");
    if out.monthly_anomalies.is_empty() {
        let _ = writeln!(s, "(none)");
    }
    for a in &out.monthly_anomalies {
        let _ = writeln!(
            s,
            "- {} (index {})  {}  deviation {}",
            a.label,
            a.index,
            money(a.total),
            money(a.deviation)
        );
    }

    let _ = writeln!(s, "\n## Top statement categories\n");
    for c in &out.source_categories {
        let _ = writeln!(s, "- {:<16} {:>12}", c.category, money(c.total));
    }

    s
}

/// Budget table for the evaluation month
pub fn render_budget(out: &RunOutput) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Budgets for {}\n", out.period);
    for b in &out.budget_status {
        let flag = if b.is_over() { "OVER" } else { "ok" };
        let _ = writeln!(
            s,
            "- {:<16} spent {:>10} of {:>10}  {}",
            b.category,
            money(b.spent),
            money(b.limit),
            flag
        );
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{BudgetLimits, CategoryRuleSet, Period};
    use tally_finance::{Pipeline, Settings};
    use tally_ingest::RawRow;

    #[test]
    fn test_render_sections() {
        let rows = vec![
            RawRow::new("2026-02-01", "3000", "Payroll"),
            RawRow::new("2026-02-02", "-550", "Whole Foods"),
        ];
        let out = Pipeline::default().run(rows, Period::Month { year: 2026, month: 2 });
        let text = render(&out);
        assert!(text.contains("Total income:   $3000.00"));
        assert!(text.contains("Total spending: $550.00"));
        assert!(text.contains("Groceries"));
        assert!(text.contains("## Rolling 30-day average"));
        assert!(text.contains("(not enough days for a full window)"));

        let budget = render_budget(&out);
        assert!(budget.contains("# Budgets for 2026-02"));
        assert!(budget.lines().any(|l| l.contains("Groceries") && l.ends_with("OVER")));
    }

    #[test]
    fn test_rolling_heading_follows_configured_window() {
        let pipeline = Pipeline::new(
            CategoryRuleSet::defaults(),
            BudgetLimits::defaults(),
            Settings {
                rolling_window: 2,
                ..Settings::default()
            },
        );
        let rows = vec![
            RawRow::new("2026-02-01", "-10", "Uber"),
            RawRow::new("2026-02-02", "-20", "Uber"),
        ];
        let text = render(&pipeline.run(rows, Period::Month { year: 2026, month: 2 }));
        assert!(text.contains("## Rolling 2-day average"));
        assert!(!text.contains("30-day"));
        assert!(text.lines().any(|l| l.starts_with("- 2026-02-02") && l.ends_with("$-15.00")));
    }

    #[test]
    fn test_render_empty_run() {
        let out = Pipeline::default().run(Vec::new(), Period::Month { year: 2026, month: 2 });
        let text = render(&out);
        assert!(text.contains("Rows: 0 read, 0 kept"));
        assert!(text.contains("(no months)"));
    }
}
