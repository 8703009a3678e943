//! Calendar period keys used for bucketing and budget evaluation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A calendar bucket. Ordering is chronological within one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Period {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year { year: i32 },
}

impl Period {
    /// Calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn quarter_of(date: NaiveDate) -> Self {
        Period::Quarter {
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
        }
    }

    pub fn year_of(date: NaiveDate) -> Self {
        Period::Year { year: date.year() }
    }

    /// First day of the period; `NaiveDate::MIN` for a hand-built period
    /// outside the calendar
    pub fn start(&self) -> NaiveDate {
        let (year, month) = match *self {
            Period::Month { year, month } => (year, Some(month)),
            Period::Quarter { year, quarter } => (
                year,
                quarter
                    .checked_sub(1)
                    .and_then(|q| q.checked_mul(3))
                    .map(|m| m + 1),
            ),
            Period::Year { year } => (year, Some(1)),
        };
        month
            .and_then(|m| NaiveDate::from_ymd_opt(year, m, 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// True if `date` falls inside this period's calendar boundaries
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Period::Month { .. } => Period::month_of(date) == *self,
            Period::Quarter { .. } => Period::quarter_of(date) == *self,
            Period::Year { .. } => Period::year_of(date) == *self,
        }
    }

    /// "2026-02", "2026Q1" or "2026"
    pub fn label(&self) -> String {
        match self {
            Period::Month { year, month } => format!("{year:04}-{month:02}"),
            Period::Quarter { year, quarter } => format!("{year:04}Q{quarter}"),
            Period::Year { year } => format!("{year:04}"),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parses a month label such as "2026-02".
impl FromStr for Period {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| ConfigError::InvalidPeriod(s.to_string()))?;
        let year: i32 = y.parse().map_err(|_| ConfigError::InvalidPeriod(s.to_string()))?;
        let month: u32 = m.parse().map_err(|_| ConfigError::InvalidPeriod(s.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(ConfigError::InvalidPeriod(s.to_string()));
        }
        Ok(Period::Month { year, month })
    }
}
