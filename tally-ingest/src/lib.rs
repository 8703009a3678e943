//! tally-ingest: statement CSV reading and record normalization.

pub mod normalize;
pub mod parsers;
pub mod types;

pub use normalize::{MAX_ABS_AMOUNT, NormalizeReport, Normalized, RowRejection, normalize, normalize_row};
pub use parsers::read_statement_csv;
pub use types::RawRow;
