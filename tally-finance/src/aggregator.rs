//! Aggregation of categorized transactions into totals, category sums,
//! calendar buckets and a dense daily series with its rolling average.
//!
//! Every output is a pure function of the transaction slice. An empty
//! slice yields zero totals and empty series.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_core::{CategorizedTransaction, Period};

/// Trailing window used for trend smoothing
pub const DEFAULT_ROLLING_WINDOW: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

impl CategoryTotal {
    pub fn new(category: impl Into<String>, total: Decimal) -> Self {
        Self {
            category: category.into(),
            total,
        }
    }
}

/// Net amount for one calendar bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotal {
    #[serde(skip)]
    pub period: Period,
    pub label: String,
    /// First day of the bucket
    pub start: NaiveDate,
    pub total: Decimal,
}

impl PeriodTotal {
    fn new(period: Period, total: Decimal) -> Self {
        Self {
            period,
            label: period.label(),
            start: period.start(),
            total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub net: Decimal,
}

/// Rolling mean for a day; `None` until a full window is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub average: Option<Decimal>,
}

/// Read-only views handed to reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub total_income: Decimal,
    /// Kept negative; take the absolute value for display
    pub total_spending: Decimal,
    /// Biggest expense first
    pub spending_by_category: Vec<CategoryTotal>,
    pub monthly_totals: Vec<PeriodTotal>,
    pub quarterly_totals: Vec<PeriodTotal>,
    pub yearly_totals: Vec<PeriodTotal>,
    pub daily_net: Vec<DailyTotal>,
    pub rolling_average: Vec<RollingPoint>,
}

impl Aggregates {
    pub fn compute(txns: &[CategorizedTransaction], rolling_window: usize) -> Self {
        let daily = daily_net(txns);
        let rolling = rolling_average(&daily, rolling_window);
        Self {
            total_income: total_income(txns),
            total_spending: total_spending(txns),
            spending_by_category: spending_by_category(txns),
            monthly_totals: period_totals(txns, Period::month_of),
            quarterly_totals: period_totals(txns, Period::quarter_of),
            yearly_totals: period_totals(txns, Period::year_of),
            daily_net: daily,
            rolling_average: rolling,
        }
    }

    /// Spending for one category (zero if absent)
    pub fn spending_for(&self, category: &str) -> Decimal {
        category_total(&self.spending_by_category, category)
    }

    /// Rolling points that have a value
    pub fn defined_rolling(&self) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.rolling_average
            .iter()
            .filter_map(|p| p.average.map(|a| (p.date, a)))
    }
}

pub fn total_income(txns: &[CategorizedTransaction]) -> Decimal {
    txns.iter()
        .map(|t| t.amount())
        .filter(|a| *a > Decimal::ZERO)
        .sum()
}

pub fn total_spending(txns: &[CategorizedTransaction]) -> Decimal {
    txns.iter()
        .map(|t| t.amount())
        .filter(|a| *a < Decimal::ZERO)
        .sum()
}

/// Negative amounts summed per category, ascending by total (most negative
/// first), ties broken by category name.
pub fn spending_by_category(txns: &[CategorizedTransaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in txns.iter().filter(|t| t.amount() < Decimal::ZERO) {
        *totals.entry(t.category.as_str()).or_default() += t.amount();
    }

    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal::new(category, total))
        .collect();
    out.sort_by(|a, b| a.total.cmp(&b.total).then_with(|| a.category.cmp(&b.category)));
    out
}

/// Category spending restricted to one calendar period
pub fn spending_in_period(txns: &[CategorizedTransaction], period: Period) -> Vec<CategoryTotal> {
    let in_period: Vec<CategorizedTransaction> = txns
        .iter()
        .filter(|t| period.contains(t.date()))
        .cloned()
        .collect();
    spending_by_category(&in_period)
}

pub fn category_total(totals: &[CategoryTotal], category: &str) -> Decimal {
    totals
        .iter()
        .find(|c| c.category == category)
        .map(|c| c.total)
        .unwrap_or(Decimal::ZERO)
}

/// Net sums per bucket, chronological
pub fn period_totals<F>(txns: &[CategorizedTransaction], bucket: F) -> Vec<PeriodTotal>
where
    F: Fn(NaiveDate) -> Period,
{
    let mut totals: BTreeMap<Period, Decimal> = BTreeMap::new();
    for t in txns {
        *totals.entry(bucket(t.date())).or_default() += t.amount();
    }
    totals
        .into_iter()
        .map(|(period, total)| PeriodTotal::new(period, total))
        .collect()
}

pub fn monthly_totals(txns: &[CategorizedTransaction]) -> Vec<PeriodTotal> {
    period_totals(txns, Period::month_of)
}

pub fn quarterly_totals(txns: &[CategorizedTransaction]) -> Vec<PeriodTotal> {
    period_totals(txns, Period::quarter_of)
}

pub fn yearly_totals(txns: &[CategorizedTransaction]) -> Vec<PeriodTotal> {
    period_totals(txns, Period::year_of)
}

/// Net amount for every calendar day from the first to the last
/// transaction. Days without transactions are present with zero.
pub fn daily_net(txns: &[CategorizedTransaction]) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in txns {
        *by_day.entry(t.date()).or_default() += t.amount();
    }

    let (Some(first), Some(last)) = (
        by_day.keys().next().copied(),
        by_day.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| DailyTotal {
            date,
            net: by_day.get(&date).copied().unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Trailing mean over `window` days (current day included). Days before
/// the first full window have no value. A zero window is treated as 1.
pub fn rolling_average(daily: &[DailyTotal], window: usize) -> Vec<RollingPoint> {
    let window = window.max(1);
    let divisor = Decimal::from(window);
    let mut sum = Decimal::ZERO;

    daily
        .iter()
        .enumerate()
        .map(|(i, day)| {
            sum += day.net;
            if i >= window {
                sum -= daily[i - window].net;
            }
            RollingPoint {
                date: day.date,
                average: (i + 1 >= window).then(|| sum / divisor),
            }
        })
        .collect()
}
