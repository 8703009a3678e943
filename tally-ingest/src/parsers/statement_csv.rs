//! Bank statement CSV export reader.
//!
//! Expected header (any column order, extra columns ignored):
//! Date,Amount,Transaction Description,Category,Merchant Category Code,Notes
//!
//! Only the first three are required. Cells are passed through as text.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;

use crate::types::RawRow;

const DATE: &str = "date";
const AMOUNT: &str = "amount";
const DESCRIPTION: &str = "transaction description";
const CATEGORY: &str = "category";
const MERCHANT_CODE: &str = "merchant category code";
const NOTES: &str = "notes";

#[derive(Debug, Default)]
struct Columns {
    date: Option<usize>,
    amount: Option<usize>,
    description: Option<usize>,
    category: Option<usize>,
    merchant_code: Option<usize>,
    notes: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self> {
        let mut cols = Columns::default();
        for (i, name) in header.iter().enumerate() {
            let slot = match name.trim().trim_start_matches('\u{feff}').to_lowercase().as_str() {
                DATE => &mut cols.date,
                AMOUNT => &mut cols.amount,
                DESCRIPTION => &mut cols.description,
                CATEGORY => &mut cols.category,
                MERCHANT_CODE => &mut cols.merchant_code,
                NOTES => &mut cols.notes,
                _ => continue,
            };
            // First occurrence wins on duplicated headers
            slot.get_or_insert(i);
        }

        let mut missing = Vec::new();
        if cols.date.is_none() {
            missing.push("Date");
        }
        if cols.amount.is_none() {
            missing.push("Amount");
        }
        if cols.description.is_none() {
            missing.push("Transaction Description");
        }
        if !missing.is_empty() {
            bail!("statement header is missing required column(s): {}", missing.join(", "));
        }
        Ok(cols)
    }
}

fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    let v = record.get(idx?)?.trim();
    if v.is_empty() { None } else { Some(v.to_string()) }
}

/// Read a statement CSV file into raw rows.
pub fn read_statement_csv(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_statement(file).with_context(|| format!("reading {}", path.display()))
}

/// Read statement CSV from any reader (header row first).
pub fn read_statement(reader: impl Read) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let cols = Columns::from_header(rdr.headers().context("reading header row")?)?;
    let mut rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("record {}", line + 1))?;
        // Skip fully blank lines (trailing rows in bank exports)
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        rows.push(RawRow {
            date: cell(&record, cols.date).unwrap_or_default(),
            amount: cell(&record, cols.amount).unwrap_or_default(),
            description: cols
                .description
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .to_string(),
            category: cell(&record, cols.category),
            merchant_code: cell(&record, cols.merchant_code),
            notes: cell(&record, cols.notes),
        });
    }

    tracing::debug!(rows = rows.len(), "read statement rows");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("sample_bank_statement.csv")
    }

    #[test]
    fn test_reads_basic_rows() {
        let text = "\
Date,Amount,Transaction Description,Category,Merchant Category Code,Notes
2026-01-03,-45.20,  Whole Foods Market ,groceries,5411,
2026-01-04,2500,Payroll ACME,,,monthly salary
";
        let rows = read_statement(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2026-01-03");
        assert_eq!(rows[0].amount, "-45.20");
        // Description is passed through untouched; the normalizer trims it
        assert_eq!(rows[0].description, "  Whole Foods Market ");
        assert_eq!(rows[0].category.as_deref(), Some("groceries"));
        assert_eq!(rows[0].merchant_code.as_deref(), Some("5411"));
        assert_eq!(rows[0].notes, None);
        assert_eq!(rows[1].category, None);
        assert_eq!(rows[1].notes.as_deref(), Some("monthly salary"));
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let text = "\
Reference,transaction description,AMOUNT,date
X1,Netflix,-15.49,2026-02-01
";
        let rows = read_statement(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Netflix");
        assert_eq!(rows[0].amount, "-15.49");
        assert_eq!(rows[0].date, "2026-02-01");
        assert_eq!(rows[0].merchant_code, None);
    }

    #[test]
    fn test_short_and_blank_rows() {
        let text = "\
Date,Amount,Transaction Description,Notes
2026-02-01,-3.50
,,,
2026-02-02,-4.00,Starbucks,latte
";
        let rows = read_statement(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "");
        assert_eq!(rows[1].notes.as_deref(), Some("latte"));
    }

    #[test]
    fn test_missing_required_header_is_error() {
        let text = "Date,Description\n2026-01-01,foo\n";
        let err = read_statement(text.as_bytes()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Amount"), "{msg}");
        assert!(msg.contains("Transaction Description"), "{msg}");
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(read_statement_csv("/definitely/not/here.csv").is_err());
    }

    #[test]
    fn test_reads_sample_statement() {
        let rows = read_statement_csv(sample_path()).expect("should read sample statement");
        assert!(rows.len() >= 20, "expected 20+ rows, got {}", rows.len());
        assert!(rows.iter().any(|r| r.description.to_lowercase().contains("whole foods")));
    }
}
