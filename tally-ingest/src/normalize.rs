//! Record normalizer: validates raw statement rows and canonicalizes them
//! into `Transaction`s.
//!
//! Rows with an unparseable date, a non-numeric amount or an amount beyond
//! `MAX_ABS_AMOUNT` are dropped and counted, never surfaced as errors. Exact duplicates (after
//! normalization) keep their first occurrence. Output is sorted by date;
//! equal dates keep input order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tally_core::{DEFAULT_MERCHANT_CODE, DEFAULT_NOTES, Transaction};
use thiserror::Error;

use crate::types::RawRow;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
/// Largest accepted magnitude for a single amount. Keeps every downstream
/// sum and squared deviation inside `Decimal` range.
pub const MAX_ABS_AMOUNT: Decimal = dec!(1000000000000);

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Why a row was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("unparseable date: {0:?}")]
    InvalidDate(String),
    #[error("non-numeric or out-of-range amount: {0:?}")]
    InvalidAmount(String),
}

/// Counts collected while normalizing one statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub rejected_dates: usize,
    pub rejected_amounts: usize,
    pub duplicates_removed: usize,
    pub unique_dates: usize,
    pub unique_descriptions: usize,
}

impl NormalizeReport {
    /// Rows dropped as malformed
    pub fn rejected(&self) -> usize {
        self.rejected_dates + self.rejected_amounts
    }

    /// Rows that survived normalization and de-duplication
    pub fn kept(&self) -> usize {
        self.rows_read - self.rejected() - self.duplicates_removed
    }
}

/// Normalized transactions plus the report describing what was dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub transactions: Vec<Transaction>,
    pub report: NormalizeReport,
}

/// Parse a date using the accepted fixed formats, falling back to
/// date-time forms whose time part is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Parse an amount as an exact decimal ("-12.50", "+3", "1.5e2").
/// Magnitudes above `MAX_ABS_AMOUNT` are refused.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .filter(|a| a.abs() <= MAX_ABS_AMOUNT)
}

/// Upper-case the first letter of each word, lower-case the rest.
/// A word starts after any non-letter ("coffee & food" -> "Coffee & Food").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// Normalize one row, or say why it cannot be used.
pub fn normalize_row(row: &RawRow) -> Result<Transaction, RowRejection> {
    let date = parse_date(&row.date).ok_or_else(|| RowRejection::InvalidDate(row.date.clone()))?;
    let amount =
        parse_amount(&row.amount).ok_or_else(|| RowRejection::InvalidAmount(row.amount.clone()))?;

    let text = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(Transaction {
        date,
        amount,
        description: row.description.trim().to_lowercase(),
        merchant_code: text(&row.merchant_code).unwrap_or_else(|| DEFAULT_MERCHANT_CODE.to_string()),
        notes: text(&row.notes).unwrap_or_else(|| DEFAULT_NOTES.to_string()),
        raw_category: text(&row.category).map(|c| title_case(&c)),
    })
}

/// Normalize a whole statement.
pub fn normalize<I>(rows: I) -> Normalized
where
    I: IntoIterator<Item = RawRow>,
{
    let mut report = NormalizeReport::default();
    let mut seen = HashSet::new();
    let mut transactions = Vec::new();

    for row in rows {
        report.rows_read += 1;
        match normalize_row(&row) {
            Ok(txn) => {
                if seen.insert(txn.clone()) {
                    transactions.push(txn);
                } else {
                    report.duplicates_removed += 1;
                }
            }
            Err(rejection) => {
                tracing::debug!(%rejection, "dropping malformed row");
                match rejection {
                    RowRejection::InvalidDate(_) => report.rejected_dates += 1,
                    RowRejection::InvalidAmount(_) => report.rejected_amounts += 1,
                }
            }
        }
    }

    // Stable: same-day rows keep input order
    transactions.sort_by_key(|t| t.date);

    report.unique_dates = transactions.iter().map(|t| t.date).collect::<HashSet<_>>().len();
    report.unique_descriptions = transactions
        .iter()
        .map(|t| t.description.as_str())
        .collect::<HashSet<_>>()
        .len();

    tracing::info!(
        rows = report.rows_read,
        kept = report.kept(),
        rejected = report.rejected(),
        duplicates = report.duplicates_removed,
        "normalized statement"
    );

    Normalized {
        transactions,
        report,
    }
}
