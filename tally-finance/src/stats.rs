//! Statistical summaries over amount series and category totals.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_core::CategorizedTransaction;

use crate::aggregator::CategoryTotal;

/// Label for transactions without a source-provided category
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: Decimal,
    pub median: Decimal,
    /// Population standard deviation
    pub std_dev: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

/// A category's share of total spending, in percent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub percent: Decimal,
}

/// `None` for an empty series or a sum outside `Decimal` range
pub fn mean(series: &[Decimal]) -> Option<Decimal> {
    if series.is_empty() {
        return None;
    }
    let sum = series
        .iter()
        .try_fold(Decimal::ZERO, |acc, x| acc.checked_add(*x))?;
    sum.checked_div(Decimal::from(series.len()))
}

/// Population standard deviation (divides by n, not n - 1).
/// `None` when the squared deviations overflow.
pub fn std_dev(series: &[Decimal]) -> Option<Decimal> {
    let mu = mean(series)?;
    let squared = series.iter().try_fold(Decimal::ZERO, |acc, x| {
        let d = x.checked_sub(mu)?;
        acc.checked_add(d.checked_mul(d)?)
    })?;
    squared.checked_div(Decimal::from(series.len()))?.sqrt()
}

pub fn median(series: &[Decimal]) -> Option<Decimal> {
    if series.is_empty() {
        return None;
    }
    let mut sorted = series.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        // lo + hi only overflows when both share a sign, where hi - lo cannot
        Some(match lo.checked_add(hi) {
            Some(sum) => sum / Decimal::TWO,
            None => lo + (hi - lo) / Decimal::TWO,
        })
    } else {
        Some(sorted[mid])
    }
}

pub fn summarize(series: &[Decimal]) -> Option<SeriesSummary> {
    Some(SeriesSummary {
        count: series.len(),
        mean: mean(series)?,
        median: median(series)?,
        std_dev: std_dev(series)?,
        min: series.iter().min().copied()?,
        max: series.iter().max().copied()?,
    })
}

/// Step-over-step percent change. A zero base, or a change outside
/// `Decimal` range, has no defined value.
pub fn percent_change(series: &[Decimal]) -> Vec<Option<Decimal>> {
    series
        .windows(2)
        .map(|w| {
            if w[0].is_zero() {
                return None;
            }
            w[1].checked_sub(w[0])?
                .checked_div(w[0])?
                .checked_mul(Decimal::ONE_HUNDRED)
        })
        .collect()
}

/// Net totals by the statement's own category column, largest first.
pub fn top_source_categories(txns: &[CategorizedTransaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in txns {
        let key = t.transaction.raw_category.as_deref().unwrap_or(UNCATEGORIZED);
        *totals.entry(key).or_default() += t.amount();
    }

    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal::new(category, total))
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    out
}

/// Percentage of total spending per category, in the input order.
pub fn category_shares(spending: &[CategoryTotal]) -> Vec<CategoryShare> {
    let Some(total) = spending
        .iter()
        .try_fold(Decimal::ZERO, |acc, c| acc.checked_add(c.total.abs()))
    else {
        return Vec::new();
    };
    if total.is_zero() {
        return Vec::new();
    }
    spending
        .iter()
        .map(|c| CategoryShare {
            category: c.category.clone(),
            percent: c.total.abs() / total * Decimal::ONE_HUNDRED,
        })
        .collect()
}
